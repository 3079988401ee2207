use lending_db::entity::evm_logs::EvmLogs;
use sqlx::{Pool, Postgres};
use std::{env, error::Error};

use crate::{defaults, events, handlers, redis_client::RedisPublisher};

/// Drain a batch of queued logs: decode, apply entity writes, then publish
/// to Redis (dual-write). A handled log is deleted from the queue; a log
/// whose handler failed stays queued and is retried next round.
pub async fn process_logs(
    db_pool: &Pool<Postgres>,
    redis: &mut RedisPublisher,
    ctx: &handlers::HandlerContext,
) -> Result<(), Box<dyn Error>> {
    let batch_size = env::var("BATCH_SIZE")
        .or::<String>(Ok(defaults::BATCH_SIZE.into()))?
        .parse::<i32>()?;

    let unprocessed_logs = EvmLogs::find_all(batch_size, db_pool).await?;

    for log in unprocessed_logs {
        let log_id = log.id;

        let event = match events::decode_event(&log) {
            Ok(event) => event,
            Err(e) => {
                // Unknown or malformed event: drop the row, it will never decode
                eprintln!("Event decode skipped (log_id={}): {}", log_id, e);
                if let Err(error) = EvmLogs::delete(log_id, db_pool).await {
                    eprintln!("Error deleting log {}: {}", log_id, error);
                }
                continue;
            }
        };

        // Cold path: entity writes. Keep the row queued on failure so the
        // idempotent handler can retry.
        if let Err(e) = handlers::dispatch(ctx, &event).await {
            eprintln!("Handler error (log_id={}): {}", log_id, e);
            continue;
        }

        // Hot path: publish the decoded payload
        match event.to_payload() {
            Ok(payload) => match redis.publish(event.channel(), &payload).await {
                Ok(_) => {
                    println!("Published to {}: {} bytes", event.channel(), payload.len());
                }
                Err(e) => {
                    eprintln!("Redis publish error: {}", e);
                    // Continue processing - don't fail the whole batch for Redis errors
                }
            },
            Err(e) => eprintln!("Payload serialization error (log_id={}): {}", log_id, e),
        }

        if let Err(error) = EvmLogs::delete(log_id, db_pool).await {
            eprintln!("Error deleting log {}: {}", log_id, error);
        }
    }

    Ok(())
}
