use std::convert::Infallible;
use std::net::SocketAddr;

use chrono::{TimeZone, Utc};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use rstest::rstest;

use dgdrive::core::MarketConfig;
use dgdrive::market::{ChartPeriod, PriceClient, PricePoint};
use dgdrive::wallet::{explorer_base, format_ether, format_gwei, format_units, network_name};
use dgdrive::DriveError;

async fn price_api(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let query = req.uri().query().unwrap_or_default().to_string();
    let resp = match req.uri().path() {
        "/api/v3/simple/price" if query.contains("ids=ethereum") => Response::new(Body::from(
            r#"{"ethereum":{"usd":2543.21,"usd_24h_change":-1.75}}"#,
        )),
        "/api/v3/coins/ethereum/market_chart" if query.contains("days=7") => Response::new(Body::from(
            r#"{"prices":[[1704067200000,2300.5],[1704153600000,2350.0]],
                "total_volumes":[[1704067200000,1000.0],[1704153600000,1500.0]]}"#,
        )),
        _ => Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .body(Body::from("slow down"))
            .unwrap(),
    };
    Ok(resp)
}

fn spawn_api() -> String {
    let make_svc = make_service_fn(|_conn| async { Ok::<_, Infallible>(service_fn(price_api)) });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    format!("http://{}/api/v3", addr)
}

fn client_for(api_url: String, asset: &str) -> PriceClient {
    PriceClient::new(MarketConfig {
        api_url,
        asset: asset.to_string(),
        vs_currency: "usd".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_spot_price() {
    let client = client_for(spawn_api(), "ethereum");
    let quote = client.spot_price().await.unwrap();
    assert_eq!(quote.price, 2543.21);
    assert_eq!(quote.change_24h, -1.75);
}

#[tokio::test]
async fn test_market_chart_points() {
    let client = client_for(spawn_api(), "ethereum");
    let points = client.market_chart(ChartPeriod::Week).await.unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(points[1].price, 2350.0);
    assert_eq!(points[1].volume, 1500.0);
    assert_eq!(points[0].label(ChartPeriod::Week), "Jan 1");
}

#[tokio::test]
async fn test_api_errors_are_market_errors() {
    let client = client_for(spawn_api(), "dogecoin");
    assert!(matches!(client.spot_price().await, Err(DriveError::Market(_))));
    assert!(matches!(
        client.market_chart(ChartPeriod::Year).await,
        Err(DriveError::Market(_))
    ));
}

#[rstest]
#[case("1d", ChartPeriod::Day, 1, "hourly")]
#[case("7d", ChartPeriod::Week, 7, "daily")]
#[case("30D", ChartPeriod::Month, 30, "daily")]
#[case("90d", ChartPeriod::Quarter, 90, "daily")]
#[case("365d", ChartPeriod::Year, 365, "daily")]
fn test_chart_periods(#[case] input: &str, #[case] period: ChartPeriod, #[case] days: u32, #[case] interval: &str) {
    let parsed: ChartPeriod = input.parse().unwrap();
    assert_eq!(parsed, period);
    assert_eq!(parsed.days(), days);
    assert_eq!(parsed.interval(), interval);
    assert_eq!(parsed.to_string(), input.to_lowercase());
}

#[test]
fn test_unknown_period_rejected() {
    assert!("2w".parse::<ChartPeriod>().is_err());
    assert_eq!(ChartPeriod::default(), ChartPeriod::Week);
}

#[rstest]
#[case(ChartPeriod::Day, "14:30")]
#[case(ChartPeriod::Month, "Mar 5")]
#[case(ChartPeriod::Year, "Mar 2024")]
fn test_point_labels(#[case] period: ChartPeriod, #[case] expected: &str) {
    let point = PricePoint {
        at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
        price: 1.0,
        volume: 0.0,
    };
    assert_eq!(point.label(period), expected);
}

#[rstest]
#[case(0, 18, "0.0")]
#[case(1_000_000_000_000_000_000, 18, "1.0")]
#[case(1_500_000_000_000_000_000, 18, "1.5")]
#[case(1, 18, "0.000000000000000001")]
#[case(123_456_789, 6, "123.456789")]
#[case(42, 0, "42")]
fn test_format_units(#[case] value: u128, #[case] decimals: u32, #[case] expected: &str) {
    assert_eq!(format_units(value, decimals), expected);
}

#[test]
fn test_ether_and_gwei() {
    assert_eq!(format_ether(2_250_000_000_000_000_000), "2.25");
    assert_eq!(format_gwei(30_000_000_000), "30.0");
}

#[rstest]
#[case(1, "Ethereum Mainnet", "https://etherscan.io")]
#[case(11155111, "Sepolia Testnet", "https://sepolia.etherscan.io")]
#[case(31337, "Hardhat Local", "https://etherscan.io")]
#[case(137, "Chain ID: 137", "https://etherscan.io")]
fn test_networks(#[case] chain_id: u64, #[case] name: &str, #[case] explorer: &str) {
    assert_eq!(network_name(chain_id), name);
    assert_eq!(explorer_base(chain_id), explorer);
}
