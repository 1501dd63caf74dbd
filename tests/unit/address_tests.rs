use photomark::watermark::{AddressInfo, GeoPoint, WatermarkContext};
use serde_json::json;

/// Trimmed reverse-geocoder response for a point in Ho Chi Minh City.
fn geocoder_response() -> serde_json::Value {
    json!({
        "place_id": 123456,
        "lat": "10.7769",
        "lon": "106.7009",
        "display_name": "12, Nguyễn Huệ, Bến Nghé, Quận 1, Hồ Chí Minh, Việt Nam",
        "address": {
            "house_number": "12",
            "road": "Nguyễn Huệ",
            "suburb": "Bến Nghé",
            "city_district": "ignored",
            "county": "Quận 1",
            "city": "Hồ Chí Minh",
            "postcode": "700000",
            "country": "Việt Nam",
            "country_code": "vn"
        }
    })
}

#[test]
fn test_geocoder_response_to_address_line() {
    let address = AddressInfo::from_geocoder_fields(&geocoder_response());
    assert_eq!(
        address.joined(),
        "12, Nguyễn Huệ, Bến Nghé, Quận 1, Hồ Chí Minh"
    );
    assert_eq!(address.country.as_deref(), Some("Việt Nam"));

    let ctx = WatermarkContext::now().with_address(address);
    assert_eq!(
        ctx.address_line().as_deref(),
        Some("12, Nguyễn Huệ, Bến Nghé, Quận 1, Hồ Chí Minh")
    );
}

#[test]
fn test_country_only_address_has_no_line() {
    let address = AddressInfo::from_geocoder_fields(&json!({ "country": "Việt Nam" }));
    let ctx = WatermarkContext::now().with_address(address);
    assert_eq!(ctx.address_line(), None);
}

#[test]
fn test_address_round_trips_camel_case_json() {
    let address = AddressInfo::from_geocoder_fields(&geocoder_response());
    let value = serde_json::to_value(&address).unwrap();
    assert_eq!(value["houseNumber"], "12");
    assert!(value.get("displayName").is_some());

    let back: AddressInfo = serde_json::from_value(value).unwrap();
    assert_eq!(back, address);
}

#[test]
fn test_negative_coordinates_display() {
    let point = GeoPoint::new(-33.8688, 151.2093);
    assert_eq!(point.display(), "-33.868800, 151.209300");
}
