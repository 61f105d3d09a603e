//! Document cleaning that runs before any extraction heuristic.

pub mod noise;
pub mod normalize;

pub use noise::NoiseProfile;
pub use normalize::normalize;

use scraper::Html;

/// Parse raw HTML, strip noise regions, and serialize the reduced tree.
///
/// The parsed document lives only for the duration of this call.
pub fn clean_html(html: &str, profile: NoiseProfile) -> String {
    let mut document = Html::parse_document(html);
    noise::strip(&mut document, profile);
    document.html()
}
