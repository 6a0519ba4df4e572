//! Property-based tests for transferkit-lib
//!
//! These tests use proptest to verify invariants across a wide range of inputs.

mod base58_properties {
    use proptest::prelude::*;
    use transferkit_lib::base58;

    proptest! {
        /// Matches the reference bs58 implementation
        #[test]
        fn agrees_with_reference(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
            prop_assert_eq!(base58::encode(&bytes), bs58::encode(&bytes).into_string());
        }

        /// One leading '1' per leading zero byte
        #[test]
        fn leading_zeros_preserved(zeros in 0usize..16, tail in prop::collection::vec(1u8..=255, 0..32)) {
            let mut bytes = vec![0u8; zeros];
            bytes.extend(&tail);
            let encoded = base58::encode(&bytes);
            let ones = encoded.chars().take_while(|&c| c == '1').count();
            prop_assert_eq!(ones, zeros);
        }

        /// Deterministic
        #[test]
        fn deterministic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(base58::encode(&bytes), base58::encode(&bytes));
        }
    }
}

mod launch_properties {
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use transferkit_lib::{build_launch_descriptor, AssetSymbol, NetworkId, TransferConfig};

    proptest! {
        /// Raw query values survive percent-encoding
        #[test]
        fn query_values_round_trip(
            partner in "[ -~]{1,24}",
            wallet in "[ -~]{1,48}",
            cents in 0i64..10_000_000,
        ) {
            let config = TransferConfig::new(
                partner.clone(),
                NetworkId::BaseMainnet,
                wallet.clone(),
                Decimal::new(cents, 2),
                AssetSymbol::Usdc,
            );
            let launch = build_launch_descriptor(&config);
            let (_, query) = launch.url().split_once('?').unwrap();

            let decoded: Vec<(String, String)> = query
                .split('&')
                .map(|pair| {
                    let (k, v) = pair.split_once('=').unwrap();
                    (k.to_string(), urlencoding::decode(v).unwrap().into_owned())
                })
                .collect();

            prop_assert_eq!(decoded.len(), 9);
            prop_assert!(decoded.contains(&("partnerId".to_string(), partner)));
            prop_assert!(decoded.contains(&("walletAddress".to_string(), wallet)));
            prop_assert!(decoded.contains(&("sourceAmount".to_string(), Decimal::new(cents, 2).to_string())));
        }
    }
}
