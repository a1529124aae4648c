//! Example walking through the delivery OTP lifecycle
//!
//! This example shows how to:
//! - Load configuration from the environment (and `.env`)
//! - Start the runtime with the configured SMS provider and record store
//! - Generate, verify, inspect and resend an OTP
//! - Read aggregate statistics
//!
//! Run with: cargo run -p bmb_infra --example otp_lifecycle_demo

use bmb_core::services::NotificationEvent;
use bmb_infra::{initialize, load_config, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config();
    init_tracing(&config.logging)?;

    println!("Bite Me Buddy OTP Lifecycle Demo");
    println!("================================\n");

    let runtime = initialize(&config).await?;
    let mut events = runtime.dispatcher.subscribe();
    println!("✓ Runtime started ({:?} storage)\n", config.storage.backend);

    // 1. Generate
    let order_id = 1042u64;
    let code = runtime.manager.generate(order_id, "9876543210");
    println!("1. Generated OTP for order #{}: {}", order_id, code);

    if let Ok(Ok(event)) =
        tokio::time::timeout(std::time::Duration::from_secs(5), events.recv()).await
    {
        match event {
            NotificationEvent::Delivered { provider_message_id, .. } => {
                println!("   SMS delivered (id: {})", provider_message_id)
            }
            other => println!("   SMS not delivered: {:?}", other),
        }
    }

    // 2. Wrong code
    let wrong = if code == "1000" { "1001" } else { "1000" };
    let outcome = runtime.manager.verify(order_id, wrong);
    println!("\n2. Verify with wrong code: {}", outcome.message);

    // 3. Status
    let status = runtime.manager.check_status(order_id);
    println!(
        "\n3. Status: attempts={}, remaining={}, expires in {}s",
        status.attempts, status.remaining_attempts, status.time_remaining_seconds
    );

    // 4. Resend
    let resent = runtime.manager.resend(order_id);
    println!("\n4. Resend: {}", resent.message);
    let fresh_code = resent.code.unwrap_or(code);

    // 5. Verify
    let outcome = runtime.manager.verify(order_id, &fresh_code);
    println!("\n5. Verify with current code: {}", outcome.message);

    // 6. Statistics
    let stats = runtime.manager.statistics();
    println!(
        "\n6. Statistics: total={}, verified={}, expired={}, active={}, success_rate={:.1}%",
        stats.total, stats.verified, stats.expired, stats.active, stats.success_rate
    );

    runtime.shutdown();
    println!("\n✓ Demo completed");
    Ok(())
}
