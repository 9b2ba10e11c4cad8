//! Review card parser
//!
//! Finds every review card on a saved page and pulls the raw text of each
//! field out of it. Nothing here fails on missing markup: an absent element
//! is an absent field.

use super::config::{ElementMarker, MarkerTable, ValueSource};
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::{RawReview, ReviewField};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

/// Tag selector plus the exact class string an element must carry
struct CompiledMarker {
    selector: Selector,
    class: String,
}

impl CompiledMarker {
    fn compile(name: &str, marker: &ElementMarker) -> ParsingResult<Self> {
        let tag = marker.tag.as_str();
        // Only bare tag names; the class is matched separately as an opaque string.
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ParsingError::invalid_marker(
                name,
                tag,
                "tag must be a bare element name",
            ));
        }

        let selector = Selector::parse(tag)
            .map_err(|e| ParsingError::invalid_marker(name, tag, e.to_string()))?;

        Ok(Self {
            selector,
            class: marker.class.clone(),
        })
    }

    fn matches(&self, element: &ElementRef) -> bool {
        element.value().attr("class") == Some(self.class.as_str())
    }
}

struct CompiledField {
    field: ReviewField,
    marker: CompiledMarker,
    source: ValueSource,
}

/// Parser for extracting raw review records from a listing page
pub struct ReviewCardParser {
    card: CompiledMarker,
    fields: Vec<CompiledField>,
}

impl ReviewCardParser {
    /// Create a parser with the default marker table
    pub fn new() -> ParsingResult<Self> {
        Self::with_markers(&MarkerTable::default())
    }

    /// Create a parser with a custom marker table
    pub fn with_markers(markers: &MarkerTable) -> ParsingResult<Self> {
        let card = CompiledMarker::compile("card", &markers.card)?;

        let mut fields = Vec::with_capacity(markers.fields.len());
        for (&field, marker) in &markers.fields {
            fields.push(CompiledField {
                field,
                marker: CompiledMarker::compile(field.as_str(), &marker.element)?,
                source: marker.source.clone(),
            });
        }

        Ok(Self { card, fields })
    }

    /// Parse raw page content and extract every card
    pub fn parse_document(&self, content: &str) -> Vec<RawReview> {
        let html = Html::parse_document(content);
        self.cards(&html).map(|card| self.extract_card(&card)).collect()
    }

    /// All review cards in document order, nested ones included
    pub fn cards<'a>(&'a self, html: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        html.select(&self.card.selector)
            .filter(|element| self.card.matches(element))
    }

    /// Extract every configured field from one card
    pub fn extract_card(&self, card: &ElementRef) -> RawReview {
        let mut raw = RawReview::default();
        for compiled in &self.fields {
            let value = first_match(card, &compiled.marker)
                .and_then(|element| read_value(&element, &compiled.source));
            trace!("{} = {:?}", compiled.field, value);
            raw.set(compiled.field, value);
        }
        raw
    }
}

impl ContextualParser for ReviewCardParser {
    type Output = Vec<RawReview>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let reviews: Vec<RawReview> = self
            .cards(html)
            .map(|card| self.extract_card(&card))
            .collect();

        debug!(
            "Found {} review cards in {}",
            reviews.len(),
            context.source().display()
        );
        Ok(reviews)
    }
}

/// First descendant of `card` (not `card` itself) matching the marker
fn first_match<'a>(card: &ElementRef<'a>, marker: &CompiledMarker) -> Option<ElementRef<'a>> {
    card.select(&marker.selector)
        .find(|element| marker.matches(element))
}

/// Read text or attribute; blank values count as absent
fn read_value(element: &ElementRef, source: &ValueSource) -> Option<String> {
    let value = match source {
        ValueSource::Text => element.text().collect::<String>().trim().to_string(),
        ValueSource::Attribute { name } => element.value().attr(name)?.trim().to_string(),
    };
    Some(value).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::config::FieldMarker;

    const FULL_CARD: &str = r#"
        <html><body>
        <div class="_c">
            <div class="biGQs _P pZUbB ncFvv osNWb">Written March 5, 2023</div>
            <span class="biGQs _P fiohW fOtGX"> traveler_jane </span>
            <div class="biGQs _P pZUbB osNWb">United States<span>12 contributions</span></div>
            <svg class="UctUV d H0" aria-label="4.0 of 5 bubbles"><title>4.0 of 5 bubbles</title></svg>
            <div class="RpeCd">Mar 2023 • Couples</div>
            <span class="yCeTE">Lovely stay</span>
            <span class="biGQs _P FwFXZ">3</span>
            <span class="JguWG">Clean rooms and <b>great</b> staff.</span>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parser_creation() {
        assert!(ReviewCardParser::new().is_ok());
    }

    #[test]
    fn test_extracts_every_field() {
        let parser = ReviewCardParser::new().unwrap();
        let reviews = parser.parse_document(FULL_CARD);

        assert_eq!(reviews.len(), 1);
        let raw = &reviews[0];
        assert_eq!(raw.created_at.as_deref(), Some("Written March 5, 2023"));
        assert_eq!(raw.username.as_deref(), Some("traveler_jane"));
        assert_eq!(raw.origin.as_deref(), Some("United States12 contributions"));
        assert_eq!(raw.rating.as_deref(), Some("4.0 of 5 bubbles"));
        assert_eq!(raw.condition.as_deref(), Some("Mar 2023 • Couples"));
        assert_eq!(raw.title.as_deref(), Some("Lovely stay"));
        assert_eq!(raw.n_like.as_deref(), Some("3"));
        assert_eq!(raw.review.as_deref(), Some("Clean rooms and great staff."));
    }

    #[test]
    fn test_class_is_matched_as_exact_string() {
        let html = r#"
            <div class="_c extra"><span class="biGQs _P fiohW fOtGX">a</span></div>
            <div class="_c"><span class="fOtGX biGQs _P fiohW">reordered</span></div>
            <div class="_c"><span class="biGQs _P fiohW fOtGX">b</span></div>
        "#;
        let parser = ReviewCardParser::new().unwrap();
        let reviews = parser.parse_document(html);

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].username, None);
        assert_eq!(reviews[1].username.as_deref(), Some("b"));
    }

    #[test]
    fn test_first_match_wins_within_card() {
        let html = r#"
            <div class="_c">
                <span class="yCeTE">first</span>
                <span class="yCeTE">second</span>
            </div>
        "#;
        let parser = ReviewCardParser::new().unwrap();
        let reviews = parser.parse_document(html);
        assert_eq!(reviews[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn test_fields_do_not_leak_between_cards() {
        let html = r#"
            <div class="_c"><span class="yCeTE">one</span></div>
            <div class="_c"><span class="JguWG">two</span></div>
        "#;
        let parser = ReviewCardParser::new().unwrap();
        let reviews = parser.parse_document(html);

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].title.as_deref(), Some("one"));
        assert_eq!(reviews[0].review, None);
        assert_eq!(reviews[1].title, None);
        assert_eq!(reviews[1].review.as_deref(), Some("two"));
    }

    #[test]
    fn test_rating_without_attribute_is_absent() {
        let html = r#"<div class="_c"><svg class="UctUV d H0"></svg></div>"#;
        let parser = ReviewCardParser::new().unwrap();
        assert_eq!(parser.parse_document(html)[0].rating, None);
    }

    #[test]
    fn test_blank_text_is_absent() {
        let html = r#"<div class="_c"><span class="biGQs _P fiohW fOtGX">   </span></div>"#;
        let parser = ReviewCardParser::new().unwrap();
        assert_eq!(parser.parse_document(html)[0].username, None);
    }

    #[test]
    fn test_no_cards() {
        let parser = ReviewCardParser::new().unwrap();
        assert!(parser.parse_document("<html><body><p>nothing</p></body></html>").is_empty());
        assert!(parser.parse_document("").is_empty());
    }

    #[test]
    fn test_rejects_css_in_tag() {
        let mut markers = MarkerTable::default();
        markers
            .fields
            .insert(ReviewField::Title, FieldMarker::text("span.yCeTE", "yCeTE"));

        let err = ReviewCardParser::with_markers(&markers).err().unwrap();
        assert!(matches!(err, ParsingError::InvalidMarker { .. }));
    }

    #[test]
    fn test_parse_with_context() {
        let parser = ReviewCardParser::new().unwrap();
        let html = Html::parse_document(FULL_CARD);
        let reviews = parser
            .parse_with_context(&html, &ParseContext::new("page.html"))
            .unwrap();
        assert_eq!(reviews.len(), 1);
    }
}
