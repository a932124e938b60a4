//! Search token codec.
//!
//! A [`SearchParams`] travels between pages as `?q=<token>`. The token is the
//! JSON text of the search, base64url-encoded without padding, so it only
//! contains `A-Z a-z 0-9 - _` and survives copy/paste, link shorteners and
//! query unescaping unchanged. Every encode and decode call site goes through
//! this module; there is no second scheme.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::search::SearchParams;
use crate::{CoreError, CoreResult};

/// Longest token we hand out. Leaves room for the rest of the URL under the
/// common 8 KiB request-line limit.
pub const MAX_TOKEN_LEN: usize = 6_000;

/// Emits unpadded output, accepts padded or unpadded input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a search into a URL-safe token.
pub fn encode(search: &SearchParams) -> CoreResult<String> {
    let text = serde_json::to_vec(search)
        .map_err(|e| CoreError::InternalError(format!("Search serialization failed: {}", e)))?;

    let token = TOKEN_ENGINE.encode(text);
    if token.len() > MAX_TOKEN_LEN {
        return Err(CoreError::EncodingOverflow {
            len: token.len(),
            max: MAX_TOKEN_LEN,
        });
    }
    Ok(token)
}

/// Decode a token produced by [`encode`].
pub fn decode(token: &str) -> CoreResult<SearchParams> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CoreError::MalformedSearchToken("empty token".to_string()));
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(CoreError::MalformedSearchToken(format!(
            "token is {} characters, limit is {}",
            token.len(),
            MAX_TOKEN_LEN
        )));
    }

    let bytes = TOKEN_ENGINE
        .decode(token)
        .map_err(|e| CoreError::MalformedSearchToken(format!("invalid base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| CoreError::MalformedSearchToken(format!("invalid search payload: {}", e)))
}

/// Decode, treating any failure as "no search context".
pub fn decode_or_none(token: &str) -> Option<SearchParams> {
    match decode(token) {
        Ok(search) => Some(search),
        Err(e) => {
            tracing::warn!("Ignoring search token: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iata::Airport;
    use crate::search::{Leg, ManualFilter, PriceRange, TimeWindow, TravelClass, Trip};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_a() -> SearchParams {
        SearchParams {
            origin_location_code: "SYD".to_string(),
            destination_location_code: "KTM".to_string(),
            from_airport: None,
            to_airport: None,
            adults: 1,
            children: 0,
            infants: 0,
            travel_class: TravelClass::Economy,
            trip: Trip::OneWay { departure_date: date(2025, 3, 10) },
            currency_code: "AUD".to_string(),
            max_results: 20,
            manual_filter: None,
        }
    }

    fn multi_city(legs: u32) -> SearchParams {
        let codes = ["SYD", "KTM", "DEL", "DXB", "LHR"];
        let origin_destinations = (0..legs)
            .map(|i| {
                let i = i as usize;
                Leg::new(i as u32 + 1, codes[i], codes[i + 1], date(2025, 4, 1 + 3 * i as u32))
            })
            .collect();
        SearchParams::new(codes[0], codes[legs as usize], Trip::MultiCity { origin_destinations })
    }

    fn awkward() -> SearchParams {
        SearchParams::new("KTM", "ZRH", Trip::OneWay { departure_date: date(2025, 12, 1) })
            .with_passengers(2, 1, 1)
            .with_travel_class(TravelClass::First)
            .with_airports(
                Airport::new("KTM", "त्रिभुवन अन्तर्राष्ट्रिय विमानस्थल", "काठमाडौं", "नेपाल"),
                Airport::new("ZRH", "Zürich & Kloten = 100% +fun ✈️🏔", "Zürich", "Schweiz #1"),
            )
    }

    fn assert_round_trip(search: &SearchParams) {
        let token = encode(search).expect("encode");
        let decoded = decode(&token).expect("decode");
        assert_eq!(&decoded, search);
        assert_eq!(encode(&decoded).expect("re-encode"), token);
    }

    fn assert_url_safe(token: &str) {
        assert!(
            token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
            "token contains reserved characters: {}",
            token
        );
    }

    #[test]
    fn test_scenario_a_one_way() {
        assert_round_trip(&scenario_a());
    }

    #[test]
    fn test_scenario_a_with_blank_return_date_is_stable() {
        let literal = r#"{"originLocationCode":"SYD","destinationLocationCode":"KTM","adults":1,
            "children":0,"infants":0,"travelClass":"ECONOMY","tripType":"one_way",
            "departureDate":"2025-03-10","returnDate":"","currencyCode":"AUD","maxResults":20}"#;

        // A token minted from the form's raw JSON, blank returnDate included.
        let legacy_token = TOKEN_ENGINE.encode(literal);
        let decoded = decode(&legacy_token).expect("decode");
        assert_eq!(decoded, scenario_a());

        let token = encode(&decoded).expect("re-encode");
        assert_eq!(token, encode(&scenario_a()).expect("encode"));
        assert_eq!(decode(&token).expect("decode"), decoded);
        assert_eq!(encode(&decode(&token).expect("decode")).expect("encode"), token);

        let json: serde_json::Value = serde_json::from_slice(&TOKEN_ENGINE.decode(&token).unwrap()).unwrap();
        assert!(json.get("returnDate").is_none());
        assert_eq!(json["departureDate"], "2025-03-10");
    }

    #[test]
    fn test_scenario_b_inverted_round_trip_is_not_the_codecs_concern() {
        let search = SearchParams::new(
            "SYD",
            "KTM",
            Trip::RoundTrip { departure_date: date(2025, 3, 10), return_date: date(2025, 3, 9) },
        );
        let decoded = decode(&encode(&search).unwrap()).unwrap();
        assert_eq!(
            decoded.trip,
            Trip::RoundTrip { departure_date: date(2025, 3, 10), return_date: date(2025, 3, 9) }
        );
    }

    #[test]
    fn test_scenario_c_multi_city_keeps_leg_order() {
        let search = SearchParams::new(
            "SYD",
            "DEL",
            Trip::MultiCity {
                origin_destinations: vec![
                    Leg::new(1, "SYD", "KTM", date(2025, 5, 2)),
                    Leg::new(2, "KTM", "PKR", date(2025, 5, 9)),
                    Leg::new(3, "PKR", "DEL", date(2025, 5, 20)),
                ],
            },
        );
        let decoded = decode(&encode(&search).unwrap()).unwrap();
        let dates: Vec<NaiveDate> = decoded.legs().iter().map(|leg| leg.date()).collect();
        assert_eq!(dates, vec![date(2025, 5, 2), date(2025, 5, 9), date(2025, 5, 20)]);
        assert_eq!(decoded, search);
    }

    #[test]
    fn test_round_trip_edge_cases() {
        let same_day = SearchParams::new(
            "SYD",
            "MEL",
            Trip::RoundTrip { departure_date: date(2025, 6, 1), return_date: date(2025, 6, 1) },
        );
        assert_round_trip(&same_day);
        for legs in 1..=4 {
            assert_round_trip(&multi_city(legs));
        }
        assert_round_trip(&awkward());

        let mut filtered = scenario_a().with_passengers(3, 2, 1);
        filtered.manual_filter = Some(ManualFilter {
            airlines: vec!["QF".to_string(), "RA".to_string()],
            price_range: Some(PriceRange { min: 250, max: 1_800 }),
            max_stops: Some(1),
            departure_window: Some(TimeWindow { from_hour: 6, to_hour: 12 }),
            arrival_window: None,
        });
        assert_round_trip(&filtered);
    }

    #[test]
    fn test_tokens_are_url_safe() {
        for search in [scenario_a(), multi_city(4), awkward()] {
            assert_url_safe(&encode(&search).unwrap());
        }
    }

    #[test]
    fn test_token_survives_query_string_transport() {
        let token = encode(&awkward()).unwrap();
        let url = format!("/flights-results?q={}&utm_source=share", token);
        let query = url.split_once('?').unwrap().1;
        let q = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("q="))
            .unwrap();
        assert_eq!(decode(q).unwrap(), awkward());
    }

    #[test]
    fn test_padded_token_is_accepted() {
        let token = encode(&scenario_a()).unwrap();
        let padding = (4 - token.len() % 4) % 4;
        let padded = format!("{}{}", token, "=".repeat(padding));
        assert_eq!(decode(&padded).unwrap(), scenario_a());
    }

    #[test]
    fn test_malformed_tokens() {
        let token = encode(&scenario_a()).unwrap();
        let candidates = [
            String::new(),
            "   ".to_string(),
            "not a token!".to_string(),
            token[..token.len() / 2].to_string(),
            TOKEN_ENGINE.encode([0xff, 0xfe, 0x00, 0x13, 0x37]),
            TOKEN_ENGINE.encode(br#"{"originLocationCode":"SYD"}"#),
            TOKEN_ENGINE.encode("[1,2,3]"),
            "A".repeat(MAX_TOKEN_LEN + 1),
        ];
        for candidate in candidates {
            match decode(&candidate) {
                Err(CoreError::MalformedSearchToken(_)) => {}
                other => panic!("expected MalformedSearchToken for {:?}, got {:?}", candidate, other),
            }
        }
    }

    #[test]
    fn test_decode_or_none_falls_back() {
        assert!(decode_or_none("%%%").is_none());
        let token = encode(&scenario_a()).unwrap();
        assert_eq!(decode_or_none(&token), Some(scenario_a()));
    }

    #[test]
    fn test_oversized_filter_overflows() {
        let mut search = scenario_a();
        search.manual_filter = Some(ManualFilter {
            airlines: (0..2_000).map(|i| format!("X{}", i)).collect(),
            ..ManualFilter::default()
        });
        match encode(&search) {
            Err(CoreError::EncodingOverflow { len, max }) => {
                assert!(len > max);
                assert_eq!(max, MAX_TOKEN_LEN);
            }
            other => panic!("expected EncodingOverflow, got {:?}", other),
        }
    }
}
