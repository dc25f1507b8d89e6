use std::time::Duration;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use kitchen_pool::{Kitchen, KitchenConfig, Priority};

fn print_usage() {
    println!("KitchenPool commands (one per line on stdin):");
    println!("  order       add a normal order");
    println!("  vip         add a VIP order");
    println!("  bot+        add a bot");
    println!("  bot-        remove the newest bot");
    println!("  status      print queues and bots");
    println!("  json        print queues and bots as JSON");
    println!("  wait <ms>   let the kitchen run for <ms> milliseconds");
    println!("  help        show this text");
    println!("  quit        close the kitchen");
    println!("Environment: KITCHEN_PROCESSING_MS, KITCHEN_INITIAL_BOTS, RUST_LOG");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = KitchenConfig::from_env()?;
    let kitchen = Kitchen::new(config);

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            None => continue,
            Some("order") => {
                let order = kitchen.add_order(Priority::Normal);
                println!("added order {}", order);
            }
            Some("vip") => {
                let order = kitchen.add_order(Priority::Vip);
                println!("added order {}", order);
            }
            Some("bot+") => {
                let bot = kitchen.add_bot();
                println!("added bot {}", bot.label());
            }
            Some("bot-") => match kitchen.remove_bot() {
                Ok((bot, Some(order))) => {
                    println!("removed bot {}, order {} returned", bot.label(), order)
                }
                Ok((bot, None)) => println!("removed bot {}", bot.label()),
                Err(e) => eprintln!("error: {}", e),
            },
            Some("status") => print!("{}", kitchen.snapshot()),
            Some("json") => println!("{}", serde_json::to_string(&kitchen.snapshot())?),
            Some("wait") => match parts.next().and_then(|v| v.parse::<u64>().ok()) {
                Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
                None => eprintln!("error: wait needs a number of milliseconds"),
            },
            Some("help") => print_usage(),
            Some("quit") => break,
            Some(other) => eprintln!("error: unknown command: {}", other),
        }
    }

    kitchen.shutdown().await;
    Ok(())
}
