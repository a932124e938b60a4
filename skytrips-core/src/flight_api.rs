use serde::{Deserialize, Serialize};

use crate::search::{Leg, SearchParams, TravelClass, MAX_PASSENGERS};

// ============================================================================
// Flight-offers request body
// ============================================================================

/// Request body accepted by the upstream flight-offers search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersRequest {
    pub currency_code: String,
    pub origin_destinations: Vec<OriginDestination>,
    pub travelers: Vec<Traveler>,
    pub sources: Vec<String>,
    pub search_criteria: SearchCriteria,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginDestination {
    pub id: String,
    pub origin_location_code: String,
    pub destination_location_code: String,
    pub departure_date_time_range: DepartureDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureDate {
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelerType {
    Adult,
    Child,
    HeldInfant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    pub id: String,
    pub traveler_type: TravelerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_adult_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub max_flight_offers: u32,
    pub flight_filters: FlightFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightFilters {
    pub cabin_restrictions: Vec<CabinRestriction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinRestriction {
    pub cabin: TravelClass,
    pub coverage: String,
    pub origin_destination_ids: Vec<String>,
}

impl FlightOffersRequest {
    pub fn from_search(search: &SearchParams) -> Self {
        let origin_destinations: Vec<OriginDestination> =
            search.legs().iter().map(OriginDestination::from).collect();
        let leg_ids = origin_destinations.iter().map(|od| od.id.clone()).collect();

        Self {
            currency_code: search.currency_code.clone(),
            origin_destinations,
            travelers: travelers(search),
            sources: vec!["GDS".to_string()],
            search_criteria: SearchCriteria {
                max_flight_offers: search.max_results,
                flight_filters: FlightFilters {
                    cabin_restrictions: vec![CabinRestriction {
                        cabin: search.travel_class,
                        coverage: "MOST_SEGMENTS".to_string(),
                        origin_destination_ids: leg_ids,
                    }],
                },
            },
        }
    }
}

impl From<&Leg> for OriginDestination {
    fn from(leg: &Leg) -> Self {
        Self {
            id: leg.id.to_string(),
            origin_location_code: leg.origin_location_code.clone(),
            destination_location_code: leg.destination_location_code.clone(),
            departure_date_time_range: DepartureDate {
                date: leg.date().format("%Y-%m-%d").to_string(),
            },
        }
    }
}

/// Adults first, then children, then infants. Ids are sequential from 1 and
/// the n-th infant sits on the n-th adult's lap. Expects a validated search.
fn travelers(search: &SearchParams) -> Vec<Traveler> {
    let mut list = Vec::with_capacity(search.passenger_count().min(MAX_PASSENGERS) as usize);
    let mut next_id = 1u32;

    for _ in 0..search.adults {
        list.push(Traveler {
            id: next_id.to_string(),
            traveler_type: TravelerType::Adult,
            associated_adult_id: None,
        });
        next_id += 1;
    }
    for _ in 0..search.children {
        list.push(Traveler {
            id: next_id.to_string(),
            traveler_type: TravelerType::Child,
            associated_adult_id: None,
        });
        next_id += 1;
    }
    for n in 0..search.infants {
        list.push(Traveler {
            id: next_id.to_string(),
            traveler_type: TravelerType::HeldInfant,
            associated_adult_id: Some((n + 1).to_string()),
        });
        next_id += 1;
    }
    list
}
