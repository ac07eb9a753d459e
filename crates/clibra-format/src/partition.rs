//! Partition codec: a gzip-compressed CSV of 1-second candles.

use clibra_aggregate::Candle;

use crate::{CsvFormatter, FormatError, Formatter, read_candles_gz};

/// Encodes one day of 1-second candles into partition bytes.
///
/// An empty slice still produces a valid partition holding only the header.
///
/// # Errors
///
/// Returns an error if CSV encoding or compression fails.
pub fn encode_partition(candles: &[Candle]) -> Result<Vec<u8>, FormatError> {
    let mut buf = Vec::with_capacity(64 + candles.len() * 48);
    CsvFormatter::gzip().write_candles(candles, &mut buf)?;
    Ok(buf)
}

/// Decodes partition bytes back into candles, in stored order.
///
/// # Errors
///
/// Returns an error if the bytes are not gzip or the table is malformed.
pub fn decode_partition(bytes: &[u8]) -> Result<Vec<Candle>, FormatError> {
    read_candles_gz(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};
    use chrono::{TimeDelta, TimeZone, Utc};
    use clibra_aggregate::aggregate_trades;
    use clibra_types::{Side, Trade};
    use proptest::prelude::*;

    #[test]
    fn test_partition_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = vec![Candle::new(ts, 100.0, 100.0, 99.0, 99.0, 3.0, 1.0, 2.0)];

        let decoded = decode_partition(&encode_partition(&candles).unwrap()).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].timestamp, ts);
        assert_relative_eq!(decoded[0].low, 99.0);
        assert_relative_eq!(decoded[0].buy_volume, 1.0);
    }

    #[test]
    fn test_empty_day_is_header_only() {
        let bytes = encode_partition(&[]).unwrap();
        assert!(!bytes.is_empty());
        assert!(decode_partition(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_partition(b"not a gzip stream").is_err());
    }

    fn arb_trade() -> impl Strategy<Value = Trade> {
        (
            0i64..86_400_000,
            prop_oneof![Just(Side::Buy), Just(Side::Sell)],
            0.000_001f64..10_000.0,
            0.000_01f64..1_000_000.0,
        )
            .prop_map(|(millis, side, size, price)| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + TimeDelta::milliseconds(millis);
                Trade::new(ts, side, size, price)
            })
    }

    fn same_value(a: f64, b: f64) -> bool {
        relative_eq!(a, b, max_relative = 1e-12)
    }

    proptest! {
        #[test]
        fn prop_aggregated_day_survives_partition(
            mut trades in prop::collection::vec(arb_trade(), 0..300)
        ) {
            trades.sort_by_key(|t| t.timestamp);
            let candles = aggregate_trades(&trades);

            let decoded = decode_partition(&encode_partition(&candles).unwrap()).unwrap();

            prop_assert_eq!(decoded.len(), candles.len());
            for (got, want) in decoded.iter().zip(&candles) {
                prop_assert_eq!(got.timestamp, want.timestamp);
                prop_assert!(same_value(got.open, want.open));
                prop_assert!(same_value(got.high, want.high));
                prop_assert!(same_value(got.low, want.low));
                prop_assert!(same_value(got.close, want.close));
                prop_assert!(same_value(got.volume, want.volume));
                prop_assert!(same_value(got.buy_volume, want.buy_volume));
                prop_assert!(same_value(got.sell_volume, want.sell_volume));
            }
        }
    }
}
