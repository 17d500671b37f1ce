//! Direct query commands (accounts, positions, holdings)

use anyhow::Result;
use serde_json::Value;

use quantplay_core::QuantplayClient;

pub async fn cmd_accounts(client: &QuantplayClient) -> Result<()> {
    let accounts = client.get_accounts().await?;

    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    println!();
    println!("📁 Accounts");
    println!("   ─────────────────────────────");

    for account in &accounts {
        match (str_field(account, "nickname"), str_field(account, "broker")) {
            (Some(nickname), Some(broker)) => println!("   {nickname} ({broker})"),
            // The record shape belongs to the remote API; dump what we got
            _ => println!("   {}", serde_json::to_string(account)?),
        }
    }

    Ok(())
}

pub async fn cmd_positions(client: &QuantplayClient, nickname: &str) -> Result<()> {
    let positions = client.get_positions(nickname).await?;

    if positions.is_empty() {
        println!("No positions for {nickname}.");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&positions)?);
    Ok(())
}

pub async fn cmd_holdings(client: &QuantplayClient, nickname: &str) -> Result<()> {
    let holdings = client.get_holdings(nickname).await?;

    if holdings.is_empty() {
        println!("No holdings for {nickname}.");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&holdings)?);
    Ok(())
}

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}
