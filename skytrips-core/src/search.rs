use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::iata::{self, Airport};
use crate::{CoreError, CoreResult};

pub const DEFAULT_CURRENCY: &str = "AUD";
pub const DEFAULT_MAX_RESULTS: u32 = 20;
/// Upper bound on legs in a multi-city search.
pub const MAX_LEGS: usize = 6;
/// Seats bookable in one search, infants on laps included.
pub const MAX_PASSENGERS: u32 = 9;

/// A flight search as collected by the search form and carried in `?q=`.
///
/// Keys are camelCase on the wire so tokens stay compatible with the JSON the
/// website already produces. The trip-specific fields (dates, legs) live in
/// [`Trip`] and are flattened next to `tripType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin_location_code: String,
    pub destination_location_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_airport: Option<Airport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_airport: Option<Airport>,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
    pub travel_class: TravelClass,
    #[serde(flatten)]
    pub trip: Trip,
    pub currency_code: String,
    pub max_results: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_filter: Option<ManualFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    Economy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    OneWay,
    RoundTrip,
    MultiCity,
}

/// Trip shape, discriminated by `tripType`. Each variant carries exactly the
/// fields that trip type requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tripType", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Trip {
    OneWay {
        departure_date: NaiveDate,
    },
    RoundTrip {
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },
    MultiCity {
        origin_destinations: Vec<Leg>,
    },
}

impl Trip {
    pub fn kind(&self) -> TripType {
        match self {
            Trip::OneWay { .. } => TripType::OneWay,
            Trip::RoundTrip { .. } => TripType::RoundTrip,
            Trip::MultiCity { .. } => TripType::MultiCity,
        }
    }
}

/// One origin-destination request within a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub id: u32,
    pub origin_location_code: String,
    pub destination_location_code: String,
    pub departure_date_time_range: DateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub date: NaiveDate,
}

impl Leg {
    pub fn new(id: u32, origin: &str, destination: &str, date: NaiveDate) -> Self {
        Self {
            id,
            origin_location_code: origin.to_string(),
            destination_location_code: destination.to_string(),
            departure_date_time_range: DateRange { date },
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.departure_date_time_range.date
    }
}

/// Results-page filter state. Carried through the token untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub airlines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stops: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_window: Option<TimeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_window: Option<TimeWindow>,
}

/// Whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

/// Hours of the day, `from_hour` inclusive, `to_hour` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub from_hour: u8,
    pub to_hour: u8,
}

impl SearchParams {
    /// Single adult, economy, default currency and result cap.
    pub fn new(origin: &str, destination: &str, trip: Trip) -> Self {
        Self {
            origin_location_code: origin.to_string(),
            destination_location_code: destination.to_string(),
            from_airport: None,
            to_airport: None,
            adults: 1,
            children: 0,
            infants: 0,
            travel_class: TravelClass::Economy,
            trip,
            currency_code: DEFAULT_CURRENCY.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            manual_filter: None,
        }
    }

    pub fn with_passengers(mut self, adults: u32, children: u32, infants: u32) -> Self {
        self.adults = adults;
        self.children = children;
        self.infants = infants;
        self
    }

    pub fn with_travel_class(mut self, travel_class: TravelClass) -> Self {
        self.travel_class = travel_class;
        self
    }

    pub fn with_airports(mut self, from: Airport, to: Airport) -> Self {
        self.from_airport = Some(from);
        self.to_airport = Some(to);
        self
    }

    pub fn trip_type(&self) -> TripType {
        self.trip.kind()
    }

    /// Saturates rather than wrapping; decoded tokens may carry any `u32`.
    pub fn passenger_count(&self) -> u32 {
        self.adults.saturating_add(self.children).saturating_add(self.infants)
    }

    /// Legs to request from the flight API. One-way yields a single leg,
    /// round-trip an outbound and a reversed return leg, multi-city the legs
    /// as entered.
    pub fn legs(&self) -> Vec<Leg> {
        let origin = &self.origin_location_code;
        let destination = &self.destination_location_code;
        match &self.trip {
            Trip::OneWay { departure_date } => vec![Leg::new(1, origin, destination, *departure_date)],
            Trip::RoundTrip { departure_date, return_date } => vec![
                Leg::new(1, origin, destination, *departure_date),
                Leg::new(2, destination, origin, *return_date),
            ],
            Trip::MultiCity { origin_destinations } => origin_destinations.clone(),
        }
    }

    /// Form-level rules. The codec never calls this; a token may carry a
    /// search that fails validation.
    pub fn validate(&self) -> CoreResult<()> {
        check_code("originLocationCode", &self.origin_location_code)?;
        check_code("destinationLocationCode", &self.destination_location_code)?;

        if self.adults < 1 {
            return Err(invalid("at least one adult is required"));
        }
        if self.infants > self.adults {
            return Err(invalid("each infant must travel with an adult"));
        }
        let total = self
            .adults
            .checked_add(self.children)
            .and_then(|n| n.checked_add(self.infants));
        if !matches!(total, Some(n) if n <= MAX_PASSENGERS) {
            return Err(invalid(format!("at most {} passengers per search", MAX_PASSENGERS)));
        }
        if !iata::is_currency_code(&self.currency_code) {
            return Err(invalid(format!("invalid currency code '{}'", self.currency_code)));
        }
        if self.max_results < 1 {
            return Err(invalid("maxResults must be positive"));
        }

        match &self.trip {
            Trip::OneWay { .. } => self.check_distinct_endpoints(),
            Trip::RoundTrip { departure_date, return_date } => {
                self.check_distinct_endpoints()?;
                if return_date < departure_date {
                    return Err(invalid(format!(
                        "returnDate {} is before departureDate {}",
                        return_date, departure_date
                    )));
                }
                Ok(())
            }
            Trip::MultiCity { origin_destinations } => validate_legs(origin_destinations),
        }
    }

    fn check_distinct_endpoints(&self) -> CoreResult<()> {
        if self.origin_location_code == self.destination_location_code {
            return Err(invalid("origin and destination must differ"));
        }
        Ok(())
    }
}

fn validate_legs(legs: &[Leg]) -> CoreResult<()> {
    if legs.is_empty() {
        return Err(invalid("multi-city search needs at least one leg"));
    }
    if legs.len() > MAX_LEGS {
        return Err(invalid(format!("multi-city search allows at most {} legs", MAX_LEGS)));
    }

    let mut previous: Option<NaiveDate> = None;
    for leg in legs {
        check_code("originDestinations.originLocationCode", &leg.origin_location_code)?;
        check_code("originDestinations.destinationLocationCode", &leg.destination_location_code)?;
        if leg.origin_location_code == leg.destination_location_code {
            return Err(invalid(format!("leg {} starts and ends at {}", leg.id, leg.origin_location_code)));
        }
        if let Some(prev) = previous {
            if leg.date() < prev {
                return Err(invalid(format!("leg {} departs before the previous leg", leg.id)));
            }
        }
        previous = Some(leg.date());
    }
    Ok(())
}

fn check_code(field: &str, code: &str) -> CoreResult<()> {
    if iata::is_iata_code(code) {
        Ok(())
    } else {
        Err(invalid(format!("{} '{}' is not an IATA code", field, code)))
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::ValidationError(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn round_trip(dep: NaiveDate, ret: NaiveDate) -> SearchParams {
        SearchParams::new("SYD", "KTM", Trip::RoundTrip { departure_date: dep, return_date: ret })
    }

    #[test]
    fn test_search_deserialization() {
        let json = r#"
            {
                "originLocationCode": "SYD",
                "destinationLocationCode": "KTM",
                "adults": 2,
                "children": 1,
                "infants": 0,
                "travelClass": "BUSINESS",
                "tripType": "round_trip",
                "departureDate": "2025-03-10",
                "returnDate": "2025-03-24",
                "currencyCode": "AUD",
                "maxResults": 20
            }
        "#;
        let search: SearchParams = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(search.travel_class, TravelClass::Business);
        assert_eq!(search.trip_type(), TripType::RoundTrip);
        assert_eq!(search.passenger_count(), 3);
        assert_eq!(
            search.trip,
            Trip::RoundTrip { departure_date: date(2025, 3, 10), return_date: date(2025, 3, 24) }
        );
    }

    #[test]
    fn test_legacy_one_way_with_empty_return_date() {
        // The old form always sent returnDate, blank for one-way searches.
        let json = r#"{"originLocationCode":"SYD","destinationLocationCode":"KTM","adults":1,
            "travelClass":"ECONOMY","tripType":"one_way","departureDate":"2025-03-10",
            "returnDate":"","currencyCode":"AUD","maxResults":20}"#;
        let search: SearchParams = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(search.trip, Trip::OneWay { departure_date: date(2025, 3, 10) });
        assert_eq!(search.children, 0);
    }

    #[test]
    fn test_round_trip_requires_return_date() {
        let json = r#"{"originLocationCode":"SYD","destinationLocationCode":"KTM","adults":1,
            "travelClass":"ECONOMY","tripType":"round_trip","departureDate":"2025-03-10",
            "currencyCode":"AUD","maxResults":20}"#;
        assert!(serde_json::from_str::<SearchParams>(json).is_err());
    }

    #[test]
    fn test_legs_per_trip_type() {
        let one_way = SearchParams::new("SYD", "KTM", Trip::OneWay { departure_date: date(2025, 3, 10) });
        assert_eq!(one_way.legs(), vec![Leg::new(1, "SYD", "KTM", date(2025, 3, 10))]);

        let legs = round_trip(date(2025, 3, 10), date(2025, 3, 20)).legs();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[1], Leg::new(2, "KTM", "SYD", date(2025, 3, 20)));

        let multi = SearchParams::new(
            "SYD",
            "DEL",
            Trip::MultiCity {
                origin_destinations: vec![
                    Leg::new(1, "SYD", "KTM", date(2025, 3, 10)),
                    Leg::new(2, "KTM", "DEL", date(2025, 3, 15)),
                ],
            },
        );
        assert_eq!(multi.legs()[1].destination_location_code, "DEL");
    }

    #[test]
    fn test_validate_accepts_same_day_round_trip() {
        assert!(round_trip(date(2025, 3, 10), date(2025, 3, 10)).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_round_trip() {
        let err = round_trip(date(2025, 3, 10), date(2025, 3, 9)).validate().unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn test_validate_passenger_rules() {
        let base = round_trip(date(2025, 3, 10), date(2025, 3, 12));
        assert!(base.clone().with_passengers(0, 1, 0).validate().is_err());
        assert!(base.clone().with_passengers(1, 0, 2).validate().is_err());
        assert!(base.with_passengers(2, 0, 2).validate().is_ok());
    }

    #[test]
    fn test_validate_caps_passenger_total() {
        let base = round_trip(date(2025, 3, 10), date(2025, 3, 12));
        assert!(base.clone().with_passengers(5, 2, 2).validate().is_ok());
        assert!(base.clone().with_passengers(5, 3, 2).validate().is_err());
        assert!(base.clone().with_passengers(2_000_000_000, 0, 0).validate().is_err());

        let overflowing = base.with_passengers(u32::MAX, 1, 0);
        assert_eq!(overflowing.passenger_count(), u32::MAX);
        let err = overflowing.validate().unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(msg) if msg.contains("passengers")));
    }

    #[test]
    fn test_validate_codes() {
        let mut search = round_trip(date(2025, 3, 10), date(2025, 3, 12));
        search.origin_location_code = "syd".to_string();
        assert!(search.validate().is_err());

        let mut search = round_trip(date(2025, 3, 10), date(2025, 3, 12));
        search.currency_code = "AU".to_string();
        assert!(search.validate().is_err());

        let search = SearchParams::new("SYD", "SYD", Trip::OneWay { departure_date: date(2025, 3, 10) });
        assert!(search.validate().is_err());
    }

    #[test]
    fn test_validate_multi_city() {
        let empty = SearchParams::new("SYD", "DEL", Trip::MultiCity { origin_destinations: vec![] });
        assert!(empty.validate().is_err());

        let out_of_order = SearchParams::new(
            "SYD",
            "DEL",
            Trip::MultiCity {
                origin_destinations: vec![
                    Leg::new(1, "SYD", "KTM", date(2025, 3, 15)),
                    Leg::new(2, "KTM", "DEL", date(2025, 3, 10)),
                ],
            },
        );
        assert!(out_of_order.validate().is_err());

        let too_many = SearchParams::new(
            "SYD",
            "DEL",
            Trip::MultiCity {
                origin_destinations: (1..=7)
                    .map(|i| Leg::new(i, "SYD", "KTM", date(2025, 3, i)))
                    .collect(),
            },
        );
        assert!(too_many.validate().is_err());
    }
}
