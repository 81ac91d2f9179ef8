use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::{Mutex, mpsc::error::TryRecvError};
use tokio::time::timeout;

use logfan::{DeliveryPolicy, LogSink, Message, SinkError, Subscribe};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn record(i: usize) -> Vec<u8> {
    format!("2020-05-01T10:00:{:02}.000Z\tinfo\tfanout.rs:{i}\tmessage {i}", i % 60).into_bytes()
}

fn texts(msgs: &[Message]) -> Vec<String> {
    msgs.iter().map(|m| m.text().to_string()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_listeners_see_identical_ordered_sequence() {
    init_tracing();
    let sink = LogSink::new();
    let (a, cancel_a) = sink.listen().await;
    let (b, cancel_b) = sink.listen().await;

    let reader_a = tokio::spawn(a.collect::<Vec<_>>());
    let reader_b = tokio::spawn(b.collect::<Vec<_>>());

    for i in 0..200 {
        sink.ingest(&record(i)).await.unwrap();
    }
    cancel_a.cancel().await;
    cancel_b.cancel().await;

    let got_a = reader_a.await.unwrap();
    let got_b = reader_b.await.unwrap();
    let want: Vec<String> = (0..200).map(|i| format!("message {i}")).collect();
    assert_eq!(texts(&got_a), want);
    assert_eq!(got_a, got_b);
}

#[tokio::test]
async fn rejected_records_reach_nobody() {
    let sink = LogSink::new();
    let (mut rx, _cancel) = sink.listen().await;

    let malformed = sink.ingest(b"2020-05-01T10:00:00.000Z\tinfo\tonly-three").await;
    assert!(matches!(malformed, Err(SinkError::MalformedRecord { fields: 3 })));

    let bad_ts = sink.ingest(b"2020-05-01T10:00:00Z\tinfo\tl\ttext").await;
    assert!(matches!(bad_ts, Err(SinkError::InvalidTimestamp { .. })));

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn late_listener_gets_no_replay() {
    let sink = LogSink::new();
    sink.ingest(&record(1)).await.unwrap();

    let (mut late, _cancel) = sink.listen().await;
    assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));

    sink.ingest(&record(2)).await.unwrap();
    assert_eq!(late.recv().await.unwrap().text(), "message 2");
}

#[tokio::test]
async fn close_ends_all_listeners_and_sink_stays_usable() {
    let sink = LogSink::new();
    let (mut a, _ca) = sink.listen().await;
    let (mut b, _cb) = sink.listen().await;

    sink.close().await.unwrap();
    assert!(timeout(Duration::from_secs(1), a.recv()).await.unwrap().is_none());
    assert!(timeout(Duration::from_secs(1), b.recv()).await.unwrap().is_none());

    // Ingest into an empty registry is a no-op fan-out.
    assert_eq!(sink.ingest(&record(3)).await, Ok(record(3).len()));

    let (mut c, _cc) = sink.listen().await;
    sink.ingest(&record(4)).await.unwrap();
    assert_eq!(c.recv().await.unwrap().text(), "message 4");
    assert!(matches!(c.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn membership_churn_during_broadcast() {
    init_tracing();
    let sink = LogSink::new();
    let (steady, steady_cancel) = sink.listen().await;
    let steady_reader = tokio::spawn(steady.collect::<Vec<_>>());

    let producer = {
        let sink = sink.clone();
        tokio::spawn(async move {
            for i in 0..500 {
                sink.ingest(&record(i)).await.unwrap();
            }
        })
    };

    let churners: Vec<_> = (0..8)
        .map(|_| {
            let sink = sink.clone();
            tokio::spawn(async move {
                for _ in 0..25 {
                    let (mut rx, cancel) = sink.listen().await;
                    let _ = rx.try_recv();
                    cancel.cancel().await;
                    cancel.cancel().await;
                    // Drain whatever arrived before the close, then see closed.
                    while rx.recv().await.is_some() {}
                }
            })
        })
        .collect();

    producer.await.unwrap();
    for c in churners {
        c.await.unwrap();
    }
    assert_eq!(sink.listener_count().await, 1);

    steady_cancel.cancel().await;
    let got = steady_reader.await.unwrap();
    let want: Vec<String> = (0..500).map(|i| format!("message {i}")).collect();
    assert_eq!(texts(&got), want);
}

#[tokio::test]
async fn drop_newest_isolates_slow_listener() {
    let sink = LogSink::builder()
        .with_queue_capacity(4)
        .with_delivery(DeliveryPolicy::DropNewest)
        .build();
    let (slow, _slow_cancel) = sink.listen().await;
    let (fast, fast_cancel) = sink.listen().await;
    let fast_reader = tokio::spawn(fast.collect::<Vec<_>>());

    for i in 0..10 {
        timeout(Duration::from_secs(1), sink.ingest(&record(i)))
            .await
            .expect("ingest must not wait on a full queue")
            .unwrap();
        tokio::task::yield_now().await;
    }
    fast_cancel.cancel().await;

    assert_eq!(slow.dropped(), 6);
    assert_eq!(sink.dropped_total(), slow.dropped());
    let got = fast_reader.await.unwrap();
    let want: Vec<String> = (0..10).map(|i| format!("message {i}")).collect();
    assert_eq!(texts(&got), want);
}

#[tokio::test]
async fn dropped_attachment_is_pruned_on_next_listen() {
    let sink = LogSink::new();
    let recorder = Arc::new(Recorder {
        seen: Mutex::new(Vec::new()),
    });

    let attachment = sink.attach(recorder.clone()).await;
    sink.ingest(&record(0)).await.unwrap();
    drop(attachment);
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }

    let (_rx, _cancel) = sink.listen().await;
    assert_eq!(sink.listener_count().await, 1);
}

struct Recorder {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_message(&self, msg: &Message) {
        self.seen.lock().await.push(msg.text().to_string());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

struct Exploder {
    calls: AtomicUsize,
}

#[async_trait]
impl Subscribe for Exploder {
    async fn on_message(&self, _msg: &Message) {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("first message explodes");
        }
    }

    fn name(&self) -> &'static str {
        "exploder"
    }
}

#[tokio::test]
async fn attached_subscribers_survive_panics_and_drain_on_detach() {
    init_tracing();
    let sink = LogSink::new();
    let recorder = Arc::new(Recorder {
        seen: Mutex::new(Vec::new()),
    });
    let exploder = Arc::new(Exploder {
        calls: AtomicUsize::new(0),
    });

    let rec_att = sink.attach(recorder.clone()).await;
    let exp_att = sink.attach(exploder.clone()).await;
    assert_eq!(rec_att.name(), "recorder");
    assert_ne!(rec_att.listener_id(), exp_att.listener_id());

    for i in 0..3 {
        sink.ingest(&record(i)).await.unwrap();
    }

    rec_att.detach().await;
    exp_att.detach().await;

    assert_eq!(
        *recorder.seen.lock().await,
        vec!["message 0", "message 1", "message 2"]
    );
    assert_eq!(exploder.calls.load(Ordering::SeqCst), 3);
    assert!(sink.is_empty().await);
}
