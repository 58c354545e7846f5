pub mod geocode;
pub mod translate;

pub use geocode::{build_geocoder, Geocoder, NominatimGeocoder};
pub use translate::{build_translator, translate_or_original, HttpTranslator, PassthroughTranslator, Translator};
