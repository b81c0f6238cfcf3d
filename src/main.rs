use anyhow::Result;
use tracing::info;

use arbiter_uci::Console;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("arbiter starting");
    Console::new().run()?;
    Ok(())
}
