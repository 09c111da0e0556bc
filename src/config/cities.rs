//! Default city set with pre-resolved weather-API grid coordinates.

use super::settings::CityConfig;

/// The five U.S. cities with listed daily high-temperature markets.
#[must_use]
pub fn default_cities() -> Vec<CityConfig> {
    vec![
        CityConfig {
            name: "New York City".to_string(),
            slug: "nyc".to_string(),
            grid_id: "OKX".to_string(),
            grid_x: 37,
            grid_y: 39,
            enabled: true,
        },
        CityConfig {
            name: "Chicago".to_string(),
            slug: "chicago".to_string(),
            grid_id: "LOT".to_string(),
            grid_x: 66,
            grid_y: 77,
            enabled: true,
        },
        CityConfig {
            name: "Seattle".to_string(),
            slug: "seattle".to_string(),
            grid_id: "SEW".to_string(),
            grid_x: 124,
            grid_y: 61,
            enabled: true,
        },
        CityConfig {
            name: "Atlanta".to_string(),
            slug: "atlanta".to_string(),
            grid_id: "FFC".to_string(),
            grid_x: 50,
            grid_y: 82,
            enabled: true,
        },
        CityConfig {
            name: "Dallas".to_string(),
            slug: "dallas".to_string(),
            grid_id: "FWD".to_string(),
            grid_x: 87,
            grid_y: 107,
            enabled: true,
        },
    ]
}
