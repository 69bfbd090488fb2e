//! Reference CLI client: one subcommand per control-surface operation,
//! positional args only, matching the server binary's own argument style.

use std::env;

use serde_json::Value;

fn usage() -> ! {
    eprintln!(
        "usage: holdem-cli <base_url> <command> [args...]\n\
         commands:\n\
         \tcreate [small_blind] [big_blind] [max_seats]\n\
         \tjoin <table_id> <name> <chips>\n\
         \tstart <table_id>\n\
         \tact <table_id> <seat> <fold|check|call|bet:<n>|raise:<n>|all_in>\n\
         \tsnapshot <table_id> [seat]\n\
         \treconnect <table_id> <seat>\n\
         \tgod <table_id> <admin_token>"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    let mut args = env::args().skip(1);
    let base_url = args.next().unwrap_or_else(|| usage());
    let command = args.next().unwrap_or_else(|| usage());
    let rest: Vec<String> = args.collect();

    let client = reqwest::Client::new();
    let result = match command.as_str() {
        "create" => create_table(&client, &base_url, &rest).await,
        "join" => join_table(&client, &base_url, &rest).await,
        "start" => start_hand(&client, &base_url, &rest).await,
        "act" => act(&client, &base_url, &rest).await,
        "snapshot" => snapshot(&client, &base_url, &rest).await,
        "reconnect" => reconnect(&client, &base_url, &rest).await,
        "god" => god_snapshot(&client, &base_url, &rest).await,
        _ => usage(),
    };

    match result {
        Ok(body) => println!("{body}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

async fn create_table(client: &reqwest::Client, base_url: &str, args: &[String]) -> reqwest::Result<String> {
    let small_blind: u64 = args.first().and_then(|s| s.parse().ok()).unwrap_or(5);
    let big_blind: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let max_seats: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(9);
    let body = serde_json::json!({
        "config": { "small_blind": small_blind, "big_blind": big_blind, "max_seats": max_seats, "ante": 0 }
    });
    post(client, &format!("{base_url}/tables"), &body).await
}

async fn join_table(client: &reqwest::Client, base_url: &str, args: &[String]) -> reqwest::Result<String> {
    let table_id = args.first().unwrap_or_else(|| usage());
    let name = args.get(1).cloned().unwrap_or_else(|| "player".to_string());
    let chips: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1000);
    let body = serde_json::json!({ "name": name, "chips": chips });
    post(client, &format!("{base_url}/tables/{table_id}/join"), &body).await
}

async fn start_hand(client: &reqwest::Client, base_url: &str, args: &[String]) -> reqwest::Result<String> {
    let table_id = args.first().unwrap_or_else(|| usage());
    post(client, &format!("{base_url}/tables/{table_id}/start"), &Value::Null).await
}

async fn act(client: &reqwest::Client, base_url: &str, args: &[String]) -> reqwest::Result<String> {
    let table_id = args.first().unwrap_or_else(|| usage());
    let seat: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or_else(|| usage());
    let spec = args.get(2).unwrap_or_else(|| usage());
    let action = parse_action(spec);
    let body = serde_json::json!({ "seat": seat, "action": action });
    post(client, &format!("{base_url}/tables/{table_id}/action"), &body).await
}

fn parse_action(spec: &str) -> Value {
    if let Some(amount) = spec.strip_prefix("bet:") {
        serde_json::json!({ "Bet": amount.parse::<u64>().unwrap_or(0) })
    } else if let Some(amount) = spec.strip_prefix("raise:") {
        serde_json::json!({ "RaiseTo": amount.parse::<u64>().unwrap_or(0) })
    } else {
        match spec {
            "fold" => Value::String("Fold".to_string()),
            "check" => Value::String("Check".to_string()),
            "call" => Value::String("Call".to_string()),
            "all_in" => Value::String("AllIn".to_string()),
            _ => usage(),
        }
    }
}

async fn snapshot(client: &reqwest::Client, base_url: &str, args: &[String]) -> reqwest::Result<String> {
    let table_id = args.first().unwrap_or_else(|| usage());
    let mut url = format!("{base_url}/tables/{table_id}/snapshot");
    if let Some(seat) = args.get(1) {
        url = format!("{url}?seat={seat}");
    }
    get(client, &url).await
}

async fn reconnect(client: &reqwest::Client, base_url: &str, args: &[String]) -> reqwest::Result<String> {
    let table_id = args.first().unwrap_or_else(|| usage());
    let seat: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or_else(|| usage());
    let body = serde_json::json!({ "seat": seat });
    post(client, &format!("{base_url}/tables/{table_id}/reconnect"), &body).await
}

async fn god_snapshot(client: &reqwest::Client, base_url: &str, args: &[String]) -> reqwest::Result<String> {
    let table_id = args.first().unwrap_or_else(|| usage());
    let admin_token = args.get(1).unwrap_or_else(|| usage());
    let response = client
        .get(format!("{base_url}/admin/tables/{table_id}"))
        .header("X-Admin-Token", admin_token)
        .send()
        .await?;
    response.text().await
}

async fn post(client: &reqwest::Client, url: &str, body: &Value) -> reqwest::Result<String> {
    client.post(url).json(body).send().await?.text().await
}

async fn get(client: &reqwest::Client, url: &str) -> reqwest::Result<String> {
    client.get(url).send().await?.text().await
}
