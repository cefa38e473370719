// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{Place, PlaceKind};

const fn city(name: &'static str, aliases: &'static [&'static str], lat: f64, lon: f64) -> Place {
    Place {
        name,
        aliases,
        lat,
        lon,
        kind: PlaceKind::City,
        coastal: false,
    }
}

const fn port(name: &'static str, aliases: &'static [&'static str], lat: f64, lon: f64) -> Place {
    Place {
        name,
        aliases,
        lat,
        lon,
        kind: PlaceKind::City,
        coastal: true,
    }
}

const fn country(
    name: &'static str,
    aliases: &'static [&'static str],
    lat: f64,
    lon: f64,
) -> Place {
    Place {
        name,
        aliases,
        lat,
        lon,
        kind: PlaceKind::Country,
        coastal: false,
    }
}

const fn region(name: &'static str, aliases: &'static [&'static str], lat: f64, lon: f64) -> Place {
    Place {
        name,
        aliases,
        lat,
        lon,
        kind: PlaceKind::Region,
        coastal: false,
    }
}

const fn historic(
    name: &'static str,
    aliases: &'static [&'static str],
    lat: f64,
    lon: f64,
) -> Place {
    Place {
        name,
        aliases,
        lat,
        lon,
        kind: PlaceKind::Historical,
        coastal: false,
    }
}

const fn landmark(
    name: &'static str,
    aliases: &'static [&'static str],
    lat: f64,
    lon: f64,
) -> Place {
    Place {
        name,
        aliases,
        lat,
        lon,
        kind: PlaceKind::Landmark,
        coastal: false,
    }
}

/// Offline fallback table. Order matters for the fuzzy prefix lookup:
/// earlier entries win.
pub static PLACES: &[Place] = &[
    // North America
    port("New York", &["new york city", "nyc", "new york ny", "manhattan"], 40.7128, -74.0060),
    port("Los Angeles", &["la", "los angeles ca", "l.a."], 34.0522, -118.2437),
    city("Chicago", &["chicago il"], 41.8781, -87.6298),
    port("Boston", &["boston ma"], 42.3601, -71.0589),
    port("San Francisco", &["sf", "san fran"], 37.7749, -122.4194),
    port("Seattle", &[], 47.6062, -122.3321),
    city("Denver", &[], 39.7392, -104.9903),
    city("Atlanta", &[], 33.7490, -84.3880),
    city("Dallas", &["dallas fort worth"], 32.7767, -96.7970),
    port("Houston", &[], 29.7604, -95.3698),
    port("Miami", &[], 25.7617, -80.1918),
    city("Phoenix", &[], 33.4484, -112.0740),
    city("Las Vegas", &["vegas"], 36.1699, -115.1398),
    city("Washington DC", &["washington d.c.", "dc", "d.c."], 38.9072, -77.0369),
    port("Philadelphia", &["philly"], 39.9526, -75.1652),
    city("Minneapolis", &[], 44.9778, -93.2650),
    city("Detroit", &[], 42.3314, -83.0458),
    city("Charlotte", &[], 35.2271, -80.8431),
    city("Portland", &["portland oregon", "portland or"], 45.5051, -122.6750),
    city("Salt Lake City", &["slc"], 40.7608, -111.8910),
    city("Kansas City", &[], 39.0997, -94.5786),
    port("New Orleans", &["nola"], 29.9511, -90.0715),
    city("Orlando", &[], 28.5383, -81.3792),
    port("San Diego", &[], 32.7157, -117.1611),
    city("Nashville", &[], 36.1627, -86.7816),
    city("Austin", &[], 30.2672, -97.7431),
    port("Anchorage", &[], 61.2181, -149.9003),
    port("Honolulu", &[], 21.3069, -157.8583),
    city("Springfield", &["springfield il"], 39.7817, -89.6501),
    port("Toronto", &[], 43.6532, -79.3832),
    port("Vancouver", &[], 49.2827, -123.1207),
    port("Montreal", &["montréal"], 45.5017, -73.5673),
    city("Mexico City", &["cdmx", "ciudad de mexico"], 19.4326, -99.1332),
    port("Cancun", &["cancún"], 21.1619, -86.8515),
    port("Havana", &["la habana"], 23.1136, -82.3666),
    port("San Juan", &["san juan pr"], 18.4655, -66.1057),
    city("San Jose", &["san jose ca"], 37.3382, -121.8863),
    // South America
    port("Rio de Janeiro", &["rio"], -22.9068, -43.1729),
    city("São Paulo", &["sao paulo"], -23.5505, -46.6333),
    port("Buenos Aires", &[], -34.6037, -58.3816),
    city("Bogota", &["bogotá"], 4.7110, -74.0721),
    port("Lima", &[], -12.0464, -77.0428),
    city("Santiago", &["santiago chile"], -33.4489, -70.6693),
    city("Quito", &[], -0.1807, -78.4678),
    city("La Paz", &[], -16.5000, -68.1500),
    port("Montevideo", &[], -34.9011, -56.1645),
    city("Cusco", &["cuzco"], -13.5320, -71.9675),
    // Europe
    port("London", &["london uk", "london england"], 51.5074, -0.1278),
    city("Paris", &["paris france"], 48.8566, 2.3522),
    city("Rome", &["rome italy", "roma"], 41.9028, 12.4964),
    city("Berlin", &["berlin germany"], 52.5200, 13.4050),
    city("Madrid", &[], 40.4168, -3.7038),
    port("Barcelona", &[], 41.3874, 2.1686),
    port("Lisbon", &["lisboa"], 38.7223, -9.1393),
    port("Porto", &[], 41.1579, -8.6291),
    port("Amsterdam", &[], 52.3676, 4.9041),
    city("Brussels", &["bruxelles"], 50.8503, 4.3517),
    city("Vienna", &["wien"], 48.2082, 16.3738),
    city("Prague", &["praha"], 50.0755, 14.4378),
    city("Budapest", &[], 47.4979, 19.0402),
    city("Warsaw", &["warszawa"], 52.2297, 21.0122),
    city("Krakow", &["kraków"], 50.0647, 19.9450),
    city("Munich", &["münchen", "muenchen"], 48.1351, 11.5820),
    port("Hamburg", &[], 53.5500, 9.9937),
    city("Frankfurt", &[], 50.1109, 8.6821),
    city("Zurich", &["zürich"], 47.3769, 8.5417),
    city("Geneva", &["genève"], 46.2044, 6.1432),
    city("Milan", &["milano"], 45.4654, 9.1859),
    city("Florence", &["firenze"], 43.7696, 11.2558),
    port("Venice", &["venezia"], 45.4408, 12.3155),
    port("Naples", &["napoli"], 40.8518, 14.2681),
    city("Lyon", &[], 45.7640, 4.8357),
    port("Marseille", &["marseilles"], 43.2965, 5.3698),
    port("Nice", &[], 43.7102, 7.2620),
    port("Athens", &["athina"], 37.9838, 23.7275),
    port("Istanbul", &[], 41.0082, 28.9784),
    port("Copenhagen", &["københavn"], 55.6761, 12.5683),
    port("Stockholm", &[], 59.3293, 18.0686),
    port("Oslo", &[], 59.9139, 10.7522),
    port("Helsinki", &[], 60.1699, 24.9384),
    port("Reykjavik", &["reykjavík"], 64.1466, -21.9426),
    port("Dublin", &[], 53.3498, -6.2603),
    port("Edinburgh", &[], 55.9533, -3.1883),
    city("Manchester", &[], 53.4808, -2.2426),
    city("Birmingham", &[], 52.4862, -1.8904),
    city("York", &["york england"], 53.9600, -1.0873),
    city("Oxford", &[], 51.7520, -1.2577),
    city("Cambridge", &[], 52.2053, 0.1218),
    port("Dover", &[], 51.1279, 1.3134),
    port("Calais", &[], 50.9513, 1.8587),
    port("Seville", &["sevilla"], 37.3891, -5.9845),
    port("Valencia", &[], 39.4699, -0.3763),
    port("Dubrovnik", &[], 42.6507, 18.0944),
    port("Split", &[], 43.5081, 16.4402),
    city("Zagreb", &[], 45.8150, 15.9819),
    city("Belgrade", &["beograd"], 44.7866, 20.4489),
    city("Bucharest", &[], 44.4268, 26.1025),
    city("Sofia", &[], 42.6977, 23.3219),
    port("Riga", &[], 56.9460, 24.1059),
    port("Tallinn", &[], 59.4370, 24.7536),
    city("Vilnius", &[], 54.6872, 25.2797),
    city("Kyiv", &["kiev"], 50.4501, 30.5234),
    city("Moscow", &["moskva"], 55.7558, 37.6173),
    port("Saint Petersburg", &["st petersburg", "st. petersburg", "leningrad"], 59.9311, 30.3609),
    // Africa and the Middle East
    city("Cairo", &[], 30.0444, 31.2357),
    port("Alexandria", &["alexandria egypt"], 31.2001, 29.9187),
    city("Giza", &[], 29.9870, 31.2118),
    city("Luxor", &[], 25.6872, 32.6396),
    port("Cape Town", &[], -33.9249, 18.4241),
    city("Johannesburg", &["joburg"], -26.2041, 28.0473),
    city("Nairobi", &[], -1.2921, 36.8219),
    port("Mombasa", &[], -4.0435, 39.6682),
    port("Lagos", &[], 6.5244, 3.3792),
    port("Casablanca", &[], 33.5731, -7.5898),
    city("Marrakech", &["marrakesh"], 31.6295, -7.9811),
    port("Tunis", &[], 36.8065, 10.1815),
    port("Dakar", &[], 14.7167, -17.4677),
    city("Addis Ababa", &["addis"], 9.0192, 38.7525),
    port("Zanzibar", &[], -6.1659, 39.2026),
    city("Jerusalem", &[], 31.7683, 35.2137),
    port("Tel Aviv", &[], 32.0853, 34.7818),
    port("Beirut", &[], 33.8938, 35.5018),
    city("Damascus", &[], 33.5138, 36.2765),
    city("Baghdad", &[], 33.3152, 44.3661),
    city("Tehran", &[], 35.6892, 51.3890),
    port("Dubai", &[], 25.2048, 55.2708),
    port("Abu Dhabi", &[], 24.4539, 54.3773),
    port("Doha", &[], 25.2854, 51.5310),
    city("Riyadh", &[], 24.7136, 46.6753),
    city("Mecca", &["makkah"], 21.3891, 39.8579),
    city("Petra", &[], 30.3285, 35.4444),
    // Asia and Oceania
    port("Tokyo", &[], 35.6762, 139.6503),
    city("Kyoto", &[], 35.0116, 135.7681),
    port("Osaka", &[], 34.6937, 135.5023),
    port("Seoul", &[], 37.5665, 126.9780),
    city("Beijing", &["peking"], 39.9042, 116.4074),
    port("Shanghai", &[], 31.2304, 121.4737),
    port("Hong Kong", &[], 22.3193, 114.1694),
    port("Taipei", &[], 25.0330, 121.5654),
    port("Singapore", &[], 1.3521, 103.8198),
    port("Bangkok", &[], 13.7563, 100.5018),
    city("Hanoi", &[], 21.0278, 105.8342),
    port("Ho Chi Minh City", &["saigon", "ho chi minh"], 10.8231, 106.6297),
    port("Kuala Lumpur", &["kl"], 3.1390, 101.6869),
    port("Jakarta", &[], -6.2088, 106.8456),
    port("Manila", &[], 14.5995, 120.9842),
    port("Mumbai", &["bombay"], 19.0760, 72.8777),
    city("Delhi", &["new delhi"], 28.7041, 77.1025),
    city("Agra", &[], 27.1767, 78.0081),
    city("Bangalore", &["bengaluru"], 12.9716, 77.5946),
    port("Kolkata", &["calcutta"], 22.5726, 88.3639),
    city("Kathmandu", &[], 27.7172, 85.3240),
    city("Samarkand", &[], 39.6542, 66.9597),
    city("Xi'an", &["xian", "chang'an"], 34.3416, 108.9398),
    port("Sydney", &[], -33.8688, 151.2093),
    port("Melbourne", &[], -37.8136, 144.9631),
    port("Brisbane", &[], -27.4698, 153.0251),
    port("Perth", &[], -31.9505, 115.8605),
    port("Auckland", &[], -36.8485, 174.7633),
    port("Wellington", &[], -41.2865, 174.7762),
    // Countries
    country("United States", &["usa", "united states of america", "america"], 39.8283, -98.5795),
    country("Canada", &[], 56.1304, -106.3468),
    country("Mexico", &[], 23.6345, -102.5528),
    country("Brazil", &[], -14.2350, -51.9253),
    country("Argentina", &[], -38.4161, -63.6167),
    country("Peru", &[], -9.1900, -75.0152),
    country("United Kingdom", &["uk", "great britain", "britain"], 55.3781, -3.4360),
    country("England", &[], 52.3555, -1.1743),
    country("Scotland", &[], 56.4907, -4.2026),
    country("Ireland", &["eire"], 53.1424, -7.6921),
    country("France", &[], 46.2276, 2.2137),
    country("Germany", &["deutschland"], 51.1657, 10.4515),
    country("Italy", &["italia"], 41.8719, 12.5674),
    country("Spain", &["españa"], 40.4637, -3.7492),
    country("Portugal", &[], 39.3999, -8.2245),
    country("Greece", &[], 39.0742, 21.8243),
    country("Turkey", &["türkiye"], 38.9637, 35.2433),
    country("Egypt", &[], 26.8206, 30.8025),
    country("Morocco", &[], 31.7917, -7.0926),
    country("Kenya", &[], -0.0236, 37.9062),
    country("South Africa", &[], -30.5595, 22.9375),
    country("Israel", &[], 31.0461, 34.8516),
    country("Iran", &[], 32.4279, 53.6880),
    country("India", &[], 20.5937, 78.9629),
    country("China", &[], 35.8617, 104.1954),
    country("Japan", &[], 36.2048, 138.2529),
    country("Thailand", &[], 15.8700, 100.9925),
    country("Vietnam", &["viet nam"], 14.0583, 108.2772),
    country("Australia", &[], -25.2744, 133.7751),
    country("New Zealand", &["nz"], -40.9006, 174.8860),
    // Regions
    region("Europe", &[], 54.5260, 15.2551),
    region("Asia", &[], 34.0479, 100.6197),
    region("Africa", &[], 8.7832, 34.5085),
    region("North America", &[], 54.5260, -105.2551),
    region("South America", &[], -8.7832, -55.4915),
    region("Oceania", &[], -22.7359, 140.0188),
    region("Middle East", &["the middle east"], 29.2985, 42.5510),
    region("Scandinavia", &[], 64.0, 15.0),
    region("Mediterranean", &["the mediterranean"], 38.0, 15.0),
    region("Caribbean", &["the caribbean"], 18.0, -72.0),
    region("Balkans", &["the balkans"], 43.0, 21.0),
    region("Silk Road", &["the silk road"], 40.0, 75.0),
    region("Alps", &["the alps"], 46.5, 10.0),
    region("Sahara", &["the sahara"], 23.4162, 25.6628),
    region("Patagonia", &[], -41.8102, -68.9063),
    region("New England", &[], 43.9654, -70.8227),
    region("Tuscany", &["toscana"], 43.7711, 11.2486),
    region("Provence", &[], 43.9352, 6.0679),
    // Historical places and approximate historical regions
    historic("Ancient Rome", &["roman empire", "the roman empire"], 41.8925, 12.4853),
    historic("Ancient Greece", &["classical greece"], 37.9715, 23.7257),
    historic("Ancient Egypt", &["pharaonic egypt"], 29.9792, 31.1342),
    historic("Mesopotamia", &[], 33.0, 44.0),
    historic("Babylon", &[], 32.5364, 44.4209),
    historic("Nineveh", &[], 36.3594, 43.1528),
    historic("Ur", &[], 30.9626, 46.1030),
    historic("Persian Empire", &["persia", "achaemenid empire"], 29.9355, 52.8916),
    historic("Byzantium", &["constantinople", "byzantine empire"], 41.0086, 28.9802),
    historic("Carthage", &[], 36.8528, 10.3233),
    historic("Troy", &[], 39.9575, 26.2390),
    historic("Sparta", &[], 37.0755, 22.4297),
    historic("Thebes", &["thebes egypt"], 25.7188, 32.6573),
    historic("Memphis", &["memphis egypt"], 29.8445, 31.2508),
    historic("Pompeii", &[], 40.7462, 14.4989),
    historic("Ottoman Empire", &[], 39.9334, 32.8597),
    historic("Holy Roman Empire", &[], 50.1109, 10.4515),
    historic("Aztec Empire", &["tenochtitlan", "tenochtitlán"], 19.4352, -99.1312),
    historic("Inca Empire", &[], -13.5320, -71.9675),
    historic("Mongol Empire", &["karakorum"], 47.1980, 102.8240),
    historic("Angkor", &["angkor wat", "khmer empire"], 13.4125, 103.8670),
    historic("Jericho", &[], 31.8667, 35.4500),
    historic("Athens Acropolis", &["acropolis", "the acropolis"], 37.9715, 23.7267),
    historic("Hastings", &["battle of hastings"], 50.8543, 0.5735),
    historic("Waterloo", &["battle of waterloo"], 50.6800, 4.4120),
    historic("Gettysburg", &["battle of gettysburg"], 39.8309, -77.2311),
    // Landmarks
    landmark("Machu Picchu", &[], -13.1631, -72.5450),
    landmark("Eiffel Tower", &["the eiffel tower"], 48.8584, 2.2945),
    landmark("Colosseum", &["the colosseum", "coliseum"], 41.8902, 12.4922),
    landmark("Stonehenge", &[], 51.1789, -1.8262),
    landmark("Great Wall of China", &["the great wall", "great wall"], 40.4319, 116.5704),
    landmark("Taj Mahal", &["the taj mahal"], 27.1751, 78.0421),
    landmark("Pyramids of Giza", &["great pyramid", "the pyramids", "pyramids"], 29.9792, 31.1342),
    landmark("Grand Canyon", &["the grand canyon"], 36.1069, -112.1129),
    landmark("Statue of Liberty", &["the statue of liberty"], 40.6892, -74.0445),
    landmark("Golden Gate Bridge", &["golden gate"], 37.8199, -122.4783),
    landmark("Mount Everest", &["everest"], 27.9881, 86.9250),
    landmark("Mount Fuji", &["fuji"], 35.3606, 138.7274),
    landmark("Yellowstone", &["yellowstone national park"], 44.4280, -110.5885),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_aliases_are_unique() {
        let mut seen = HashSet::new();
        for place in PLACES {
            let name = place.name.to_lowercase();
            assert!(seen.insert(name.clone()), "duplicate key '{}'", name);
            for alias in place.aliases {
                assert_eq!(*alias, alias.to_lowercase(), "alias must be lower case");
                assert!(seen.insert(alias.to_string()), "duplicate alias '{}'", alias);
            }
        }
    }

    #[test]
    fn test_coordinates_in_range() {
        for place in PLACES {
            assert!((-90.0..=90.0).contains(&place.lat), "{}", place.name);
            assert!((-180.0..=180.0).contains(&place.lon), "{}", place.name);
        }
    }
}
