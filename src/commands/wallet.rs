use crate::core::{DriveClient, Result};
use crate::market::ChartPeriod;
use crate::wallet::format_ether;
use super::MarketArgs;

/// Implements the `wallet` command
pub struct WalletCommand;

impl WalletCommand {
    pub async fn execute(client: &DriveClient) -> Result<()> {
        let summary = client.wallet_summary().await?;
        println!("{}", summary);
        Ok(())
    }
}

/// Implements the `market` command
pub struct MarketCommand<'a> {
    args: &'a MarketArgs,
}

impl<'a> MarketCommand<'a> {
    pub fn new(args: &'a MarketArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &DriveClient) -> Result<()> {
        let period: ChartPeriod = self.args.period.parse()?;
        let dashboard = client.dashboard(period).await?;

        println!("{}", dashboard.summary);
        match dashboard.quote {
            Some(quote) => {
                let ether: f64 = format_ether(dashboard.summary.balance_wei).parse().unwrap_or(0.0);
                println!(
                    "Price:     {:.2} ({:+.2}% 24h), balance worth {:.2}",
                    quote.price,
                    quote.change_24h,
                    ether * quote.price
                );
            }
            None => println!("Price:     unavailable"),
        }

        for point in &dashboard.chart {
            println!("  {:<8} {:>12.2}  vol {:.0}", point.label(period), point.price, point.volume);
        }
        Ok(())
    }
}
