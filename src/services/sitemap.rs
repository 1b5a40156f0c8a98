use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::models::listing::Listing;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Static storefront pages included in every sitemap.
const STATIC_PAGES: &[(&str, &str, &str)] = &[
    ("/", "daily", "1.0"),
    ("/kids", "daily", "0.8"),
    ("/premium", "daily", "0.8"),
    ("/sell", "weekly", "0.6"),
    ("/faqs", "weekly", "0.5"),
];

/// Builds the sitemap.xml document from the current set of listings.
pub struct SitemapService;

impl SitemapService {
    /// URL path for one listing, with a readable slug derived from brand and
    /// model.
    #[must_use]
    pub fn listing_path(listing: &Listing) -> String {
        let slug = format!("{} {}", listing.brand, listing.model)
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");

        format!("/listings/{}-{}", listing.id, urlencoding::encode(&slug))
    }

    pub fn build(base_url: &str, listings: &[Listing]) -> Result<String> {
        let base = base_url.trim_end_matches('/');
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_NS));
        writer.write_event(Event::Start(urlset))?;

        for (path, changefreq, priority) in STATIC_PAGES {
            Self::write_url(&mut writer, &format!("{base}{path}"), None, changefreq, priority)?;
        }

        for listing in listings {
            // lastmod wants a date, not the full timestamp.
            let lastmod = listing.created_at.get(..10);
            Self::write_url(
                &mut writer,
                &format!("{base}{}", Self::listing_path(listing)),
                lastmod,
                "weekly",
                "0.7",
            )?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;

        Ok(String::from_utf8(writer.into_inner())?)
    }

    fn write_url(
        writer: &mut Writer<Vec<u8>>,
        loc: &str,
        lastmod: Option<&str>,
        changefreq: &str,
        priority: &str,
    ) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("url")))?;

        writer.write_event(Event::Start(BytesStart::new("loc")))?;
        writer.write_event(Event::Text(BytesText::new(loc)))?;
        writer.write_event(Event::End(BytesEnd::new("loc")))?;

        if let Some(lastmod) = lastmod {
            writer.write_event(Event::Start(BytesStart::new("lastmod")))?;
            writer.write_event(Event::Text(BytesText::new(lastmod)))?;
            writer.write_event(Event::End(BytesEnd::new("lastmod")))?;
        }

        writer.write_event(Event::Start(BytesStart::new("changefreq")))?;
        writer.write_event(Event::Text(BytesText::new(changefreq)))?;
        writer.write_event(Event::End(BytesEnd::new("changefreq")))?;

        writer.write_event(Event::Start(BytesStart::new("priority")))?;
        writer.write_event(Event::Text(BytesText::new(priority)))?;
        writer.write_event(Event::End(BytesEnd::new("priority")))?;

        writer.write_event(Event::End(BytesEnd::new("url")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::{
        Category, Condition, CycleType, FrameMaterial, ListingStatus, Suspension, Transmission,
        WheelSize,
    };

    fn sample_listing(id: i32) -> Listing {
        Listing {
            id,
            seller_id: 1,
            category: Category::Adult,
            brand: "Trek".to_string(),
            model: "Marlin 7".to_string(),
            purchase_year: 2023,
            price: 85000,
            gear_transmission: Transmission::MultiSpeed,
            frame_material: FrameMaterial::Aluminum,
            suspension: Suspension::Front,
            condition: Condition::Good,
            cycle_type: CycleType::Mountain,
            wheel_size: WheelSize::W29,
            has_receipt: true,
            additional_details: None,
            images: vec![],
            is_premium: false,
            status: ListingStatus::Available,
            views: 0,
            inquiries: 0,
            created_at: "2026-03-04T10:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_listing_path_slug() {
        let path = SitemapService::listing_path(&sample_listing(7));
        assert_eq!(path, "/listings/7-trek-marlin-7");
    }

    #[test]
    fn test_sitemap_contains_static_pages_and_listings() {
        let xml =
            SitemapService::build("https://cyclery.example/", &[sample_listing(7)]).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://cyclery.example/</loc>"));
        assert!(xml.contains("<loc>https://cyclery.example/kids</loc>"));
        assert!(xml.contains("<loc>https://cyclery.example/listings/7-trek-marlin-7</loc>"));
        assert!(xml.contains("<lastmod>2026-03-04</lastmod>"));
        assert!(xml.contains(SITEMAP_NS));
    }
}
