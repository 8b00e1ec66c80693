use std::env;
use std::path::PathBuf;
use std::process;

use taq_replay::channel::kafka::KafkaChannel;
use taq_replay::pacing::SleepWaiter;
use taq_replay::session::ReplaySession;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: replayer <topic> <file name | directory>");
        process::exit(2);
    }
    let topic = &args[1];
    let input = PathBuf::from(&args[2]);

    let brokers = env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
    let channel = match KafkaChannel::connect(&brokers) {
        Ok(channel) => channel,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let session = ReplaySession::new(topic, channel, SleepWaiter);
    if let Err(e) = session.run(&input).await {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}
