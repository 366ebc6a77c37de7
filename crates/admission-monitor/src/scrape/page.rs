use super::fetch::PageFetcher;
use super::normalizer::clean_text;
use super::row::parse_row;
use crate::registry::DirectionDescriptor;
use crate::snapshot::{
    Applicant, DirectionIdentity, DirectionMetadata, DirectionResult, FailedDirection,
    ScrapedDirection,
};
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Applicant table body on a direction page.
pub const APPLICANT_TABLE_SELECTOR: &str = "tbody#abitTable";

/// Everything extracted from one direction page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub metadata: DirectionMetadata,
    pub applicants: Vec<Applicant>,
}

struct PageSelectors {
    title: Selector,
    info_block: Selector,
    description: Selector,
    table_body: Selector,
    row: Selector,
    cell: Selector,
}

fn selectors() -> &'static PageSelectors {
    static SELECTORS: OnceLock<PageSelectors> = OnceLock::new();
    SELECTORS.get_or_init(|| PageSelectors {
        title: Selector::parse("h2.title").expect("title selector is valid"),
        info_block: Selector::parse("div.directions_bold-and-text")
            .expect("info block selector is valid"),
        description: Selector::parse("p.description").expect("description selector is valid"),
        table_body: Selector::parse(APPLICANT_TABLE_SELECTOR).expect("table selector is valid"),
        row: Selector::parse("tr").expect("row selector is valid"),
        cell: Selector::parse("td").expect("cell selector is valid"),
    })
}

#[derive(Debug, Clone, Copy)]
enum MetadataField {
    TotalApplications,
    AvailablePlaces,
    Form,
    FundingType,
}

struct MetadataLabel {
    label: &'static str,
    field: MetadataField,
    pattern: Regex,
}

// Checked in order; the first label present in a fragment claims it.
fn metadata_labels() -> &'static [MetadataLabel] {
    static LABELS: OnceLock<Vec<MetadataLabel>> = OnceLock::new();
    LABELS.get_or_init(|| {
        const SOURCE: &[(&str, MetadataField, &str)] = &[
            (
                "Поданных заявлений:",
                MetadataField::TotalApplications,
                r"Поданных заявлений:\s*(\d+)",
            ),
            (
                "Количество мест:",
                MetadataField::AvailablePlaces,
                r"Количество мест:\s*(\d+)",
            ),
            ("Форма обучения:", MetadataField::Form, r"Форма обучения:\s*(.+)"),
            ("Основа обучения:", MetadataField::FundingType, r"Основа обучения:\s*(.+)"),
        ];

        SOURCE
            .iter()
            .map(|&(label, field, pattern)| MetadataLabel {
                label,
                field,
                pattern: Regex::new(pattern).expect("metadata pattern is valid"),
            })
            .collect()
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Extracts header metadata and the ranked applicant rows from a direction page.
pub fn parse_document(document: &Html) -> ParsedPage {
    ParsedPage {
        metadata: extract_metadata(document),
        applicants: extract_applicants(document),
    }
}

pub fn parse_html(html: &str) -> ParsedPage {
    parse_document(&Html::parse_document(html))
}

fn extract_metadata(document: &Html) -> DirectionMetadata {
    let selectors = selectors();
    let mut metadata = DirectionMetadata {
        name: document
            .select(&selectors.title)
            .next()
            .map(|title| clean_text(&element_text(title))),
        ..DirectionMetadata::default()
    };

    let Some(info_block) = document.select(&selectors.info_block).next() else {
        return metadata;
    };

    for fragment in info_block.select(&selectors.description) {
        let text = element_text(fragment);
        let Some(label) = metadata_labels()
            .iter()
            .find(|label| text.contains(label.label))
        else {
            continue;
        };
        let Some(value) = label
            .pattern
            .captures(&text)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str())
        else {
            continue;
        };

        match label.field {
            MetadataField::TotalApplications => {
                if let Ok(count) = value.parse() {
                    metadata.total_applications = Some(count);
                }
            }
            MetadataField::AvailablePlaces => {
                if let Ok(count) = value.parse() {
                    metadata.available_places = Some(count);
                }
            }
            MetadataField::Form => metadata.form = Some(clean_text(value)),
            MetadataField::FundingType => metadata.funding_type = Some(clean_text(value)),
        }
    }

    metadata
}

fn extract_applicants(document: &Html) -> Vec<Applicant> {
    let selectors = selectors();
    let Some(table_body) = document.select(&selectors.table_body).next() else {
        return Vec::new();
    };

    table_body
        .select(&selectors.row)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&selectors.cell).map(element_text).collect();
            parse_row(&cells)
        })
        .collect()
}

/// Fetches and parses one direction. Every failure, a panic included, comes back as
/// [`DirectionResult::Failed`].
pub fn scrape_direction<F>(fetcher: &F, descriptor: &DirectionDescriptor) -> DirectionResult
where
    F: PageFetcher + ?Sized,
{
    info!(direction = %descriptor.name, url = %descriptor.url, "scraping direction");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        fetcher
            .fetch(&descriptor.url)
            .map(|html| parse_html(&html))
            .map_err(|err| err.to_string())
    }))
    .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));

    let identity = DirectionIdentity {
        direction_id: descriptor.id.clone(),
        direction_code: descriptor.code.clone(),
        direction_name: descriptor.name.clone(),
        url: descriptor.url.clone(),
    };
    let scraped_at = now();

    match outcome {
        Ok(page) => {
            info!(
                code = %descriptor.code,
                applicants = page.applicants.len(),
                "direction scraped"
            );
            DirectionResult::Scraped(ScrapedDirection {
                identity,
                metadata: page.metadata,
                applicants: page.applicants,
                scraped_at,
            })
        }
        Err(error) => {
            warn!(url = %descriptor.url, %error, "direction scrape failed");
            DirectionResult::Failed(FailedDirection {
                identity,
                error,
                scraped_at,
            })
        }
    }
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("unexpected failure while processing direction: {detail}")
}
