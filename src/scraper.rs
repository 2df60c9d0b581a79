use std::time::Duration;

use color_eyre::Result;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};

pub const LISTING_URL: &str = "https://lsf.jp/rent/nam_1.php";
pub const DETAIL_BASE_URL: &str = "https://lsf.jp/rent/bui_1.php";

pub static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("lsf_notifier/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build scraping client")
});

pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Html>;
}

pub struct HttpFetch;

impl Fetch for HttpFetch {
    fn fetch(&self, url: &str) -> Result<Html> {
        let body = CLIENT.get(url).send()?.error_for_status()?.text()?;
        Ok(Html::parse_document(&body))
    }
}

/// What one sweep knows about one house: `value` is compared byte-for-byte
/// against the stored state, `house_name` and `lines` only feed the
/// notification text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signal {
    pub house_name: String,
    pub value: String,
    pub lines: Vec<String>,
}

pub fn detail_url(house_id: &str) -> String {
    format!("{DETAIL_BASE_URL}?dn={house_id}")
}

pub trait Strategy {
    /// URL of the document that carries this house id's signal.
    fn document_url(&self, house_id: &str) -> String;
    /// Missing nodes yield an empty signal, never an error.
    fn extract(&self, document: &Html, house_id: &str) -> Signal;
    fn message(&self, signal: &Signal, house_id: &str) -> String;
}

fn select_one<'a>(element: &'a ElementRef, selector: &str) -> Option<ElementRef<'a>> {
    element
        .select(&Selector::parse(selector).unwrap())
        .next()
}

/// Split `<name>【<count>】` on the bracket glyphs. The glyphs are multi-byte,
/// so slicing happens at their char boundaries, never at a fixed byte offset.
pub fn split_house_info(info: &str) -> Option<(String, String)> {
    let start = info.find('【')?;
    let rest = &info[start + '【'.len_utf8()..];
    let end = rest.find('】')?;
    Some((info[..start].to_string(), rest[..end].to_string()))
}

/// Reads every watched house from the one shared listing page.
pub struct ListingStrategy;

impl Strategy for ListingStrategy {
    fn document_url(&self, _house_id: &str) -> String {
        LISTING_URL.to_string()
    }

    fn extract(&self, document: &Html, house_id: &str) -> Signal {
        let selector = format!(".nam_table tbody tr td ul li a[href='bui_1.php?dn={house_id}']");
        let root = document.root_element();
        let Some(link) = select_one(&root, &selector) else {
            return Signal::default();
        };
        let info = link.text().collect::<String>();
        match split_house_info(&info) {
            Some((house_name, value)) => Signal {
                house_name,
                value,
                lines: Vec::new(),
            },
            None => Signal::default(),
        }
    }

    fn message(&self, signal: &Signal, house_id: &str) -> String {
        format!(
            "[{}【{}】]({})",
            signal.house_name,
            signal.value,
            detail_url(house_id)
        )
    }
}

/// Reads each house from its own detail page. Predates the listing page and
/// kept as a fallback for when a house is delisted from it.
pub struct DetailStrategy;

impl Strategy for DetailStrategy {
    fn document_url(&self, house_id: &str) -> String {
        detail_url(house_id)
    }

    fn extract(&self, document: &Html, _house_id: &str) -> Signal {
        let root = document.root_element();
        let house_name = select_one(&root, "table.jyu_table tr td span")
            .map(|e| e.text().collect::<String>())
            .unwrap_or_default();
        let Some(hit_box) = select_one(&root, "#hitnum_box") else {
            return Signal {
                house_name,
                ..Signal::default()
            };
        };
        // Compared verbatim, whitespace included.
        let value = hit_box.text().collect::<String>();
        let mut lines = Vec::new();
        for (i, span) in hit_box
            .select(&Selector::parse("span").unwrap())
            .enumerate()
        {
            let count = span.text().collect::<String>();
            match i {
                0 => lines.push(format!("Repaired house: {count}")),
                1 => lines.push(format!("General house: {count}")),
                _ => break,
            }
        }
        Signal {
            house_name,
            value,
            lines,
        }
    }

    fn message(&self, signal: &Signal, house_id: &str) -> String {
        let mut message = format!("House name: {}\n", signal.house_name);
        for line in &signal.lines {
            message.push_str(line);
            message.push('\n');
        }
        message.push_str(&format!("URL: {}\n", detail_url(house_id)));
        message
    }
}
