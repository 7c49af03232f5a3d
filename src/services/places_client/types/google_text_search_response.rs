use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceViewport {
    pub northeast: PlaceLatLng,
    pub southwest: PlaceLatLng,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeometry {
    #[serde(default)]
    pub location: PlaceLatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<PlaceViewport>,
}

/// One text search result. Everything besides identity, name and position
/// (address, rating, photos, opening hours, ...) is carried in `details`
/// untouched so it serializes back out as the API sent it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub geometry: PlaceGeometry,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GoogleTextSearchResponse {
    #[serde(default)]
    pub html_attributions: Vec<Value>,
    #[serde(
        default,
        deserialize_with = "empty_token_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub results: Vec<Place>,
    #[serde(default)]
    pub status: String,
}

fn empty_token_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_and_missing_tokens_are_terminal() {
        let empty: GoogleTextSearchResponse =
            serde_json::from_str(r#"{"results": [], "next_page_token": "", "status": "OK"}"#)
                .unwrap();
        let missing: GoogleTextSearchResponse =
            serde_json::from_str(r#"{"results": [], "status": "OK"}"#).unwrap();
        let null: GoogleTextSearchResponse =
            serde_json::from_str(r#"{"next_page_token": null}"#).unwrap();

        assert_eq!(empty.next_page_token, None);
        assert_eq!(missing.next_page_token, None);
        assert_eq!(null.next_page_token, None);
    }

    #[test]
    fn keeps_unknown_place_fields() {
        let body = json!({
            "results": [{
                "place_id": "abc",
                "name": "Whole Foods Market",
                "geometry": {
                    "location": {"lat": 40.7, "lng": -73.9},
                    "viewport": {
                        "northeast": {"lat": 41.0, "lng": -73.0},
                        "southwest": {"lat": 40.0, "lng": -74.0}
                    }
                },
                "rating": 4.5,
                "types": ["grocery_or_supermarket", "store"],
                "opening_hours": {"open_now": true}
            }],
            "next_page_token": "tok",
            "status": "OK"
        });

        let page: GoogleTextSearchResponse = serde_json::from_value(body).unwrap();
        let place = &page.results[0];

        assert_eq!(page.next_page_token.as_deref(), Some("tok"));
        assert_eq!(place.place_id, "abc");
        assert_eq!(place.geometry.location.lat, 40.7);
        assert_eq!(place.details["rating"], json!(4.5));
        assert_eq!(place.details["opening_hours"]["open_now"], json!(true));

        let out = serde_json::to_value(place).unwrap();
        assert_eq!(out["types"], json!(["grocery_or_supermarket", "store"]));
        assert_eq!(out["geometry"]["viewport"]["southwest"]["lng"], json!(-74.0));
    }

    #[test]
    fn minimal_place_decodes_with_defaults() {
        let page: GoogleTextSearchResponse = serde_json::from_str(
            r#"{"results": [{"name": "name", "geometry": {"location": {"lat": 1.0, "lng": 2.0}}}]}"#,
        )
        .unwrap();

        assert_eq!(page.results[0].place_id, "");
        assert_eq!(page.results[0].geometry.location.lng, 2.0);
        assert!(page.results[0].details.is_empty());
        assert_eq!(page.status, "");
    }
}
