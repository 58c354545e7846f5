// src/towns.rs
//
// Static reference data for the coastal regions and towns the family is considering.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Coastal,
    Inland,
}

#[derive(Debug)]
pub struct Region {
    pub name: &'static str,
    /// Region path segment used by the portals ("sicilia" for Sicily).
    pub slug: &'static str,
    pub description: &'static str,
    pub climate: &'static str,
    pub airport_hub: &'static str,
}

#[derive(Debug)]
pub struct Town {
    pub name: &'static str,
    pub region: &'static str,
    pub setting: Setting,
    pub kind: &'static str,
    pub population: Option<&'static str>,
    pub beach_walk: &'static str,
    pub town_center: &'static str,
    pub airport_time: &'static str,
    pub price_range: Option<&'static str>,
    pub pros: &'static str,
    pub cons: Option<&'static str>,
    pub search_terms: &'static [&'static str],
    /// Casa.it path below /vendita/residenziale/, when it differs from "<region>/<town>".
    pub casa_path: Option<&'static str>,
}

pub const REGIONS: &[Region] = &[
    Region {
        name: "Puglia",
        slug: "puglia",
        description: "Heel of Italy - Authentic, affordable, great food",
        climate: "Mediterranean, mild winters, hot summers",
        airport_hub: "Bari Airport (BRI)",
    },
    Region {
        name: "Calabria",
        slug: "calabria",
        description: "Toe of Italy - Stunning coast, mountains, very affordable",
        climate: "Mediterranean, mild winters, perfect summers",
        airport_hub: "Lamezia Terme Airport (SUF)",
    },
    Region {
        name: "Sicily",
        slug: "sicilia",
        description: "Mediterranean island - Diverse, cultural, great airports",
        climate: "Mediterranean, warm winters, hot summers",
        airport_hub: "Catania Airport (CTA) or Palermo Airport (PMO)",
    },
    Region {
        name: "Liguria",
        slug: "liguria",
        description: "Italian Riviera - Stunning but expensive",
        climate: "Mild year-round, protected by mountains",
        airport_hub: "Genoa Airport (GOA)",
    },
];

pub const TOWNS: &[Town] = &[
    // Puglia
    Town {
        name: "Monopoli",
        region: "Puglia",
        setting: Setting::Coastal,
        kind: "Historic port town",
        population: Some("49,000"),
        beach_walk: "5 minutes to old port and beaches",
        town_center: "Medieval old town, daily market, restaurants",
        airport_time: "45 minutes to Bari",
        price_range: Some("€120k-350k typical"),
        pros: "Authentic, walkable, great restaurants, airport access",
        cons: Some("Can be crowded in summer"),
        search_terms: &["monopoli", "puglia", "bari"],
        casa_path: None,
    },
    Town {
        name: "Polignano a Mare",
        region: "Puglia",
        setting: Setting::Coastal,
        kind: "Cliff-top coastal gem",
        population: Some("17,000"),
        beach_walk: "10 minutes down to beach via stairs/paths",
        town_center: "Compact center, famous for cliff views",
        airport_time: "45 minutes to Bari",
        price_range: Some("€150k-400k (premium for views)"),
        pros: "Stunning views, Instagram famous, walkable",
        cons: Some("Tourist crowds, higher prices, limited beach access"),
        search_terms: &["polignano a mare", "puglia"],
        casa_path: None,
    },
    Town {
        name: "Otranto",
        region: "Puglia",
        setting: Setting::Coastal,
        kind: "Historic walled coastal city",
        population: Some("5,800"),
        beach_walk: "2 minutes to town beach, many others nearby",
        town_center: "UNESCO cathedral, shops, restaurants in walls",
        airport_time: "1.5 hours to Brindisi, 2 hours to Bari",
        price_range: Some("€80k-250k great value"),
        pros: "Historic, affordable, authentic, pristine beaches",
        cons: Some("Further from airport, smaller town"),
        search_terms: &["otranto", "puglia", "salento"],
        casa_path: None,
    },
    Town {
        name: "Castro",
        region: "Puglia",
        setting: Setting::Coastal,
        kind: "Cliff-top fishing village",
        population: None,
        beach_walk: "Marina Castro below with restaurants",
        town_center: "Small but charming center with essentials",
        airport_time: "1.5 hours to Brindisi",
        price_range: None,
        pros: "Quiet, authentic, stunning coastal views",
        cons: None,
        search_terms: &["castro", "puglia", "salento"],
        casa_path: None,
    },
    Town {
        name: "Rodi Garganico",
        region: "Puglia",
        setting: Setting::Coastal,
        kind: "Gargano seaside town",
        population: None,
        beach_walk: "Town sits above long sandy beaches",
        town_center: "Compact historic center on the promontory",
        airport_time: "2 hours to Bari",
        price_range: None,
        pros: "Beaches on both sides of town, quiet outside summer",
        cons: Some("Long drive to the airport"),
        search_terms: &["rodi garganico", "puglia", "foggia"],
        casa_path: Some("puglia/foggia/rodi-garganico"),
    },
    Town {
        name: "Andria",
        region: "Puglia",
        setting: Setting::Inland,
        kind: "Inland city near coast",
        population: Some("100,000"),
        beach_walk: "30 minutes drive to coast",
        town_center: "Large city with all amenities, cathedral",
        airport_time: "30 minutes to Bari",
        price_range: Some("€60k-200k very affordable"),
        pros: "Affordable, authentic, all services, airport access",
        cons: Some("Not coastal, need car for beach"),
        search_terms: &["andria", "puglia"],
        casa_path: None,
    },
    // Calabria
    Town {
        name: "Tropea",
        region: "Calabria",
        setting: Setting::Coastal,
        kind: "Famous cliff-top beach resort",
        population: Some("6,000"),
        beach_walk: "5 minutes down cliff path to famous beach",
        town_center: "Tourist-focused but charming historic center",
        airport_time: "1 hour to Lamezia Terme",
        price_range: Some("€100k-300k (premium for views)"),
        pros: "World-famous beach, stunning views, good restaurants",
        cons: Some("Very touristy, seasonal closures, crowded summer"),
        search_terms: &["tropea", "calabria"],
        casa_path: None,
    },
    Town {
        name: "Pizzo",
        region: "Calabria",
        setting: Setting::Coastal,
        kind: "Working fishing town",
        population: Some("9,000"),
        beach_walk: "5 minutes to town beach",
        town_center: "Authentic center, famous for tartufo gelato",
        airport_time: "30 minutes to Lamezia Terme",
        price_range: Some("€70k-180k excellent value"),
        pros: "Authentic, affordable, great food, airport close",
        cons: Some("Less English spoken, working town feel"),
        search_terms: &["pizzo", "calabria"],
        casa_path: None,
    },
    Town {
        name: "Scilla",
        region: "Calabria",
        setting: Setting::Coastal,
        kind: "Mythical fishing village",
        population: Some("5,000"),
        beach_walk: "2 minutes to beach, view of Sicily",
        town_center: "Small but authentic, fishing quarter",
        airport_time: "30 minutes to Reggio Calabria",
        price_range: Some("€50k-150k incredible value"),
        pros: "Stunning location, very affordable, authentic",
        cons: Some("Very small, limited services, seasonal"),
        search_terms: &["scilla", "calabria"],
        casa_path: None,
    },
    Town {
        name: "Crotone",
        region: "Calabria",
        setting: Setting::Coastal,
        kind: "Ancient coastal city",
        population: Some("65,000"),
        beach_walk: "10 minutes to various beaches",
        town_center: "Historic center, archaeological museum",
        airport_time: "1.5 hours to Lamezia Terme",
        price_range: Some("€40k-120k very affordable"),
        pros: "Affordable, authentic, historic, full services",
        cons: Some("Less touristy (pro/con), further from airport"),
        search_terms: &["crotone", "calabria"],
        casa_path: None,
    },
    // Sicily
    Town {
        name: "Cefalù",
        region: "Sicily",
        setting: Setting::Coastal,
        kind: "Norman cathedral coastal town",
        population: Some("14,000"),
        beach_walk: "2 minutes to golden beach from center",
        town_center: "Medieval streets, shops, restaurants, cathedral",
        airport_time: "1 hour to Palermo",
        price_range: Some("€120k-350k (tourist premium)"),
        pros: "Stunning beach in town, walkable, good restaurants",
        cons: Some("Tourist crowds, higher prices, parking issues"),
        search_terms: &["cefalu", "sicilia", "palermo"],
        casa_path: None,
    },
    Town {
        name: "Taormina",
        region: "Sicily",
        setting: Setting::Coastal,
        kind: "Hilltop resort town",
        population: Some("11,000"),
        beach_walk: "10 min cable car to Isola Bella beach",
        town_center: "Luxury shopping, restaurants, Greek theater",
        airport_time: "1 hour to Catania",
        price_range: Some("€200k-500k+ (luxury market)"),
        pros: "World-class amenities, stunning views, cultural sites",
        cons: Some("Very expensive, very touristy, not authentic"),
        search_terms: &["taormina", "sicilia"],
        casa_path: None,
    },
    Town {
        name: "Catania",
        region: "Sicily",
        setting: Setting::Coastal,
        kind: "Major city with coast access",
        population: Some("315,000"),
        beach_walk: "15 minutes to city beaches",
        town_center: "Major city, all amenities, baroque architecture",
        airport_time: "15 minutes to Catania airport",
        price_range: Some("€80k-250k city prices"),
        pros: "All services, airport next door, cultural life",
        cons: Some("Big city, traffic, not quaint coastal feel"),
        search_terms: &["catania", "sicilia"],
        casa_path: None,
    },
    Town {
        name: "Castellammare del Golfo",
        region: "Sicily",
        setting: Setting::Coastal,
        kind: "Working port town",
        population: None,
        beach_walk: "Town beach and nearby Scopello",
        town_center: "Traditional center with harbor",
        airport_time: "1 hour to Palermo",
        price_range: None,
        pros: "Authentic, affordable, great seafood",
        cons: None,
        search_terms: &["castellammare del golfo", "sicilia"],
        casa_path: None,
    },
    // Liguria
    Town {
        name: "Monterosso al Mare",
        region: "Liguria",
        setting: Setting::Coastal,
        kind: "Cinque Terre village",
        population: Some("1,400"),
        beach_walk: "1 minute - only Cinque Terre town with beach",
        town_center: "Car-free village, train access only",
        airport_time: "2 hours to Genoa (by train)",
        price_range: Some("€300k-800k+ (premium)"),
        pros: "World heritage site, spectacular, beach access",
        cons: Some("Very expensive, very touristy, car restrictions"),
        search_terms: &["monterosso", "liguria", "cinque terre"],
        casa_path: None,
    },
    Town {
        name: "Camogli",
        region: "Liguria",
        setting: Setting::Coastal,
        kind: "Fishing village near Portofino",
        population: Some("5,500"),
        beach_walk: "3 minutes to small beach",
        town_center: "Colorful houses, harbor restaurants",
        airport_time: "45 minutes to Genoa",
        price_range: Some("€200k-500k (Riviera prices)"),
        pros: "Authentic, beautiful, good transport",
        cons: Some("Expensive, small beach, limited parking"),
        search_terms: &["camogli", "liguria"],
        casa_path: None,
    },
];

/// Lower-case, strip Italian accents, and join words with '-'.
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' => 'a',
            'è' | 'é' => 'e',
            'ì' | 'í' => 'i',
            'ò' | 'ó' => 'o',
            'ù' | 'ú' => 'u',
            other => other,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join("-")
}

pub fn find_region(name: &str) -> Option<&'static Region> {
    let wanted = slugify(name);
    REGIONS
        .iter()
        .find(|r| slugify(r.name) == wanted || r.slug == wanted)
}

/// Case- and accent-insensitive lookup, so "cefalu" finds "Cefalù".
pub fn find_town(name: &str) -> Option<&'static Town> {
    let wanted = slugify(name);
    TOWNS.iter().find(|t| slugify(t.name) == wanted)
}

/// The town part of a configured entry: "Crotone, Calabria" gives "Crotone".
pub fn configured_name(entry: &str) -> &str {
    entry.split(',').next().unwrap_or(entry).trim()
}

/// Resolves a configured entry, with or without a ", Region" suffix, against the table.
pub fn lookup_configured(entry: &str) -> Option<&'static Town> {
    find_town(configured_name(entry))
}

pub fn towns_in_region<'a>(region: &'a str) -> impl Iterator<Item = &'static Town> + 'a {
    TOWNS.iter().filter(move |t| t.region == region)
}

impl Town {
    pub fn region_info(&self) -> Option<&'static Region> {
        find_region(self.region)
    }

    pub fn region_slug(&self) -> &'static str {
        self.region_info().map(|r| r.slug).unwrap_or("italia")
    }

    pub fn slug(&self) -> String {
        slugify(self.name)
    }

    /// "Town, Region", the label stored on every listing.
    pub fn location(&self) -> String {
        format!("{}, {}", self.name, self.region)
    }

    pub fn casa_path(&self) -> String {
        match self.casa_path {
            Some(path) => path.to_string(),
            None => format!("{}/{}", self.region_slug(), self.slug()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_accents_and_spaces() {
        assert_eq!(slugify("Cefalù"), "cefalu");
        assert_eq!(slugify(" Polignano a Mare "), "polignano-a-mare");
        assert_eq!(slugify("Rodi  Garganico"), "rodi-garganico");
    }

    #[test]
    fn find_town_ignores_case_and_accents() {
        assert_eq!(find_town("cefalu").map(|t| t.name), Some("Cefalù"));
        assert_eq!(find_town("RODI GARGANICO").map(|t| t.region), Some("Puglia"));
        assert!(find_town("Milano").is_none());
    }

    #[test]
    fn configured_entries_drop_region_suffix() {
        assert_eq!(configured_name("Crotone, Calabria"), "Crotone");
        assert_eq!(configured_name("  Andria "), "Andria");
        assert_eq!(lookup_configured("Catania, Sicily").map(|t| t.name), Some("Catania"));
        assert!(lookup_configured("Milano, Lombardia").is_none());
    }

    #[test]
    fn every_town_belongs_to_a_known_region() {
        for town in TOWNS {
            assert!(town.region_info().is_some(), "{} has no region", town.name);
            assert!(!town.search_terms.is_empty(), "{} has no search terms", town.name);
        }
    }

    #[test]
    fn sicily_uses_italian_slug() {
        let catania = find_town("Catania").unwrap();
        assert_eq!(catania.region_slug(), "sicilia");
        assert_eq!(catania.location(), "Catania, Sicily");
        assert_eq!(catania.casa_path(), "sicilia/catania");
    }

    #[test]
    fn explicit_casa_path_wins() {
        let rodi = find_town("Rodi Garganico").unwrap();
        assert_eq!(rodi.casa_path(), "puglia/foggia/rodi-garganico");
    }

    #[test]
    fn region_filter() {
        let names: Vec<_> = towns_in_region("Liguria").map(|t| t.name).collect();
        assert_eq!(names, vec!["Monterosso al Mare", "Camogli"]);
    }
}
