use std::env;
use std::process;

use taq_replay::channel::kafka::KafkaReader;
use taq_replay::consumer::{drain, Consumer, DEFAULT_TOPIC, IDLE_TIMEOUT};

fn main() {
    env_logger::init();

    let topic = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

    let brokers = env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
    let mut consumer = match KafkaReader::connect(&brokers, "taq_reader") {
        Ok(consumer) => consumer,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = consumer.subscribe(&[&topic]) {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }

    let total = drain(&mut consumer, IDLE_TIMEOUT);
    consumer.close();

    println!("Total number of messages received: {}", total);
    println!("All done.");
}
