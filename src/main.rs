/*
 * Responsibility
 * - tokio runtime
 * - calls app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    authchain::app::run().await
}
