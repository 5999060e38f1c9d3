//! Integration tests for the dispatch library.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use topic_dispatch::{
    codec, process_payload, topic_handlers, BatchTrigger, DispatchError, Envelope, Generator,
    GeneratorConfig, Outbound, Result, Router, TopicMessage,
};
use topic_messages::{DbCharacter, SwCharacter};

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[tokio::test]
async fn test_topic_message_trait() {
    assert_eq!(SwCharacter::TOPIC, "StarWars");
    assert_eq!(DbCharacter::TOPIC, "DragonBall");
}

#[tokio::test]
async fn test_message_serialization() {
    let msg = SwCharacter::new(1, "Luke Skywalker", "Tatooine");

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("Luke Skywalker"));
    assert!(json.contains("Tatooine"));
    assert!(json.contains("StarWars"));

    let deserialized: SwCharacter = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, msg);
}

#[tokio::test]
async fn test_topic_handlers_macro() {
    async fn handle_star_wars(_msg: SwCharacter) -> anyhow::Result<()> {
        Ok(())
    }

    async fn handle_dragon_ball(_msg: DbCharacter) -> anyhow::Result<()> {
        Ok(())
    }

    let router = topic_handlers![
        SwCharacter => handle_star_wars,
        DbCharacter => handle_dragon_ball,
    ];

    assert!(router.is_registered("StarWars"));
    assert!(router.is_registered("DragonBall"));
    assert_eq!(router.len(), 2);
}

#[tokio::test]
async fn test_dispatch_invokes_registered_handler_once() {
    let seen: Arc<Mutex<Vec<Envelope>>> = Arc::new(Mutex::new(Vec::new()));

    let mut router = Router::new();
    let seen_by_handler = Arc::clone(&seen);
    router.register(
        "Products",
        Box::new(move |envelope| {
            let seen = Arc::clone(&seen_by_handler);
            Box::pin(async move {
                seen.lock().unwrap().push(envelope);
                Ok(())
            })
        }),
    );
    router.register(
        "Categories",
        Box::new(|_envelope| Box::pin(async { panic!("wrong handler invoked") })),
    );

    let envelope = Envelope::new("Products", fields(json!({"id": 7, "name": "widget"})));
    router.dispatch(envelope.clone()).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], envelope);
}

#[tokio::test]
async fn test_dispatch_unknown_topic() {
    async fn handle_star_wars(_msg: SwCharacter) -> anyhow::Result<()> {
        panic!("handler must not run for an unknown topic")
    }

    let router = topic_handlers![
        SwCharacter => handle_star_wars,
    ];

    let envelope = Envelope::new("Unknown", Map::new());
    let err = router.dispatch(envelope).await.unwrap_err();

    match err {
        DispatchError::UnknownTopic(topic) => assert_eq!(topic, "Unknown"),
        other => panic!("expected UnknownTopic, got {other}"),
    }

    // registration table unchanged
    assert_eq!(router.len(), 1);
    assert!(router.is_registered("StarWars"));
}

#[tokio::test]
async fn test_last_registration_wins() {
    let first_calls = Arc::new(Mutex::new(0u32));
    let second_calls = Arc::new(Mutex::new(0u32));

    let mut router = Router::new();
    let first = Arc::clone(&first_calls);
    router.register(
        "demo",
        Box::new(move |_| {
            let calls = Arc::clone(&first);
            Box::pin(async move {
                *calls.lock().unwrap() += 1;
                Ok(())
            })
        }),
    );
    let second = Arc::clone(&second_calls);
    router.register(
        "demo",
        Box::new(move |_| {
            let calls = Arc::clone(&second);
            Box::pin(async move {
                *calls.lock().unwrap() += 1;
                Ok(())
            })
        }),
    );
    assert_eq!(router.len(), 1);

    router
        .dispatch(Envelope::new("demo", Map::new()))
        .await
        .unwrap();

    assert_eq!(*first_calls.lock().unwrap(), 0);
    assert_eq!(*second_calls.lock().unwrap(), 1);
}

#[test]
fn test_codec_round_trip() {
    let envelope = Envelope::new(
        "StarWars",
        fields(json!({"id": 1, "name": "Luke", "planet": "Tatooine"})),
    );

    let bytes = codec::encode(&envelope);
    assert!(!bytes.is_empty());
    let decoded = codec::decode(&bytes, "ignored").unwrap();

    assert_eq!(decoded, envelope);
    assert_eq!(decoded.topic(), "StarWars");
}

#[test]
fn test_decode_rejects_malformed_input() {
    assert!(matches!(
        codec::decode(b"", "demo"),
        Err(DispatchError::Decode(_))
    ));
    assert!(matches!(
        codec::decode(&[0xff, 0xfe, 0x80], "demo"),
        Err(DispatchError::Decode(_))
    ));
    assert!(matches!(
        codec::decode(b"not valid json", "demo"),
        Err(DispatchError::Decode(_))
    ));
    assert!(matches!(
        codec::decode(b"[1, 2, 3]", "demo"),
        Err(DispatchError::Decode(_))
    ));
}

#[test]
fn test_decode_topic_fallback() {
    // payload carries its own topic
    let decoded = codec::decode(br#"{"topic": "StarWars", "id": 1}"#, "transport").unwrap();
    assert_eq!(decoded.topic(), "StarWars");

    // no topic field, transport topic wins
    let decoded = codec::decode(br#"{"id": 1}"#, "transport").unwrap();
    assert_eq!(decoded.topic(), "transport");
    assert_eq!(decoded.field("topic"), Some(&json!("transport")));
}

#[tokio::test]
async fn test_end_to_end_character_routing() {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let star_wars_log = Arc::clone(&log);
    let dragon_ball_log = Arc::clone(&log);
    let router = topic_handlers![
        SwCharacter => move |msg: SwCharacter| {
            let log = Arc::clone(&star_wars_log);
            async move {
                log.lock().unwrap().push(format!("sw:{}", msg.name));
                anyhow::Ok(())
            }
        },
        DbCharacter => move |msg: DbCharacter| {
            let log = Arc::clone(&dragon_ball_log);
            async move {
                log.lock().unwrap().push(format!("db:{}", msg.name));
                anyhow::Ok(())
            }
        },
    ];

    let luke = Envelope::from_message(&SwCharacter::new(1, "Luke", "Tatooine")).unwrap();
    let goku = Envelope::from_message(&DbCharacter::new(2, "Goku")).unwrap();

    router.dispatch(luke).await.unwrap();
    router.dispatch(goku).await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["sw:Luke", "db:Goku"]);
}

#[tokio::test]
async fn test_bad_messages_do_not_halt_processing() {
    async fn handle_dragon_ball(_msg: DbCharacter) -> anyhow::Result<()> {
        anyhow::bail!("handler rejects the message")
    }

    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let star_wars_log = Arc::clone(&log);
    let router = topic_handlers![
        SwCharacter => move |msg: SwCharacter| {
            let log = Arc::clone(&star_wars_log);
            async move {
                log.lock().unwrap().push(msg.name);
                anyhow::Ok(())
            }
        },
        DbCharacter => handle_dragon_ball,
    ];

    // undecodable payload: logged and dropped
    process_payload(&router, "StarWars", b"not valid json").await;

    // no handler registered: logged and dropped
    process_payload(&router, "Unknown", br#"{"id": 9, "name": "nobody"}"#).await;

    // failing handler: logged and dropped
    let goku = codec::encode(&Envelope::from_message(&DbCharacter::new(2, "Goku")).unwrap());
    process_payload(&router, "DragonBall", &goku).await;

    // a valid message afterwards still reaches its handler
    let luke =
        codec::encode(&Envelope::from_message(&SwCharacter::new(1, "Luke", "Tatooine")).unwrap());
    process_payload(&router, "StarWars", &luke).await;

    assert_eq!(*log.lock().unwrap(), vec!["Luke"]);
}

/// Recording outbound transport for generator tests.
#[derive(Clone, Copy)]
enum FailMode {
    Never,
    OddSends,
    Always,
}

struct MockOutbound {
    sent: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    attempts: Arc<Mutex<u32>>,
    flushes: Arc<Mutex<u32>>,
    fail: FailMode,
}

impl MockOutbound {
    fn new(fail: FailMode) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(0)),
            flushes: Arc::new(Mutex::new(0)),
            fail,
        }
    }
}

#[async_trait]
impl Outbound for MockOutbound {
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };
        let fail = match self.fail {
            FailMode::Never => false,
            FailMode::OddSends => attempt % 2 == 1,
            FailMode::Always => true,
        };
        if fail {
            return Err(DispatchError::Handler("simulated send failure".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    async fn flush(&self, _timeout: Duration) -> Result<()> {
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }
}

#[tokio::test]
async fn test_generator_alternates_topics_in_index_order() {
    let outbound = MockOutbound::new(FailMode::Never);
    let sent = Arc::clone(&outbound.sent);
    let flushes = Arc::clone(&outbound.flushes);

    let generator = Generator::new(outbound, GeneratorConfig::new(4));
    let count = generator.run().await.unwrap();
    assert_eq!(count, 4);

    let sent = sent.lock().unwrap();
    let topics: Vec<&str> = sent.iter().map(|(topic, _)| topic.as_str()).collect();
    assert_eq!(topics, vec!["StarWars", "DragonBall", "StarWars", "DragonBall"]);

    for (index, (topic, payload)) in sent.iter().enumerate() {
        let envelope = codec::decode(payload, topic).unwrap();
        assert_eq!(envelope.topic(), topic.as_str());
        assert_eq!(envelope.field("id"), Some(&json!(index as i64)));
    }

    assert_eq!(*flushes.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_generator_tolerates_send_failures() {
    let outbound = MockOutbound::new(FailMode::OddSends);
    let sent = Arc::clone(&outbound.sent);
    let flushes = Arc::clone(&outbound.flushes);

    let generator = Generator::new(outbound, GeneratorConfig::new(4));
    let count = generator.run().await.unwrap();

    // every other send fails, the loop keeps going and still flushes
    assert_eq!(count, 2);
    assert_eq!(sent.lock().unwrap().len(), 2);
    assert_eq!(*flushes.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_generator_fail_fast_aborts() {
    let outbound = MockOutbound::new(FailMode::Always);
    let sent = Arc::clone(&outbound.sent);
    let flushes = Arc::clone(&outbound.flushes);

    let generator = Generator::new(outbound, GeneratorConfig::new(4).with_fail_fast(true));
    let result = generator.run().await;

    assert!(result.is_err());
    assert!(sent.lock().unwrap().is_empty());
    assert_eq!(*flushes.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_generator_honors_shutdown() {
    let outbound = MockOutbound::new(FailMode::Never);
    let sent = Arc::clone(&outbound.sent);

    let generator = Generator::new(outbound, GeneratorConfig::new(100));
    generator.shutdown_handle().shutdown().await;

    let count = generator.run().await.unwrap();
    assert_eq!(count, 0);
    assert!(sent.lock().unwrap().is_empty());
}

#[test]
fn test_batch_trigger_logs_valid_events() {
    let trigger = BatchTrigger::new("StarWars");
    assert_eq!(trigger.topic(), "StarWars");

    let valid_a = br#"{"id": 1, "name": "Luke"}"#.to_vec();
    let valid_b = br#"{"id": 2, "name": "Leia"}"#.to_vec();
    let invalid = vec![0xff, 0xfe];
    let events: Vec<&[u8]> = vec![&valid_a, &invalid, &valid_b];

    assert_eq!(trigger.on_batch(&events), 2);
    assert_eq!(trigger.on_batch(&[]), 0);
}
