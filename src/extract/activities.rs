use super::{first_in, first_text_in, parse_count, parse_decimal, raw_text, selectors, ExtractResult};
use crate::model::ActivityItem;
use scraper::{ElementRef, Html};

/// Finds the activity blocks listed under the `地點摘要` heading
///
/// This walks the tree the same way as the XPath
/// `//h2[text()='地點摘要']/../../div[contains(@class,'section-layout-inset-shadow')]/div[contains(@class,'__section')]`:
/// from each matching `h2` up to its grandparent, then into the shadowed
/// container divs and their section divs. Results are in document order with
/// duplicates removed.
pub fn activity_sections(document: &Html) -> Vec<ElementRef<'_>> {
    let mut sections: Vec<ElementRef<'_>> = Vec::new();

    let headings = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "h2" && has_heading_text(element));

    for heading in headings {
        let Some(grandparent) = heading
            .parent()
            .and_then(|parent| parent.parent())
            .and_then(ElementRef::wrap)
        else {
            continue;
        };

        for container in child_divs_with_class(grandparent, selectors::ACTIVITY_CONTAINER_CLASS) {
            for section in child_divs_with_class(container, selectors::ACTIVITY_SECTION_CLASS) {
                if !sections.iter().any(|seen| seen.id() == section.id()) {
                    sections.push(section);
                }
            }
        }
    }

    sections
}

/// XPath `text()=` compares individual text children, not the joined text
fn has_heading_text(element: &ElementRef<'_>) -> bool {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| &**text == selectors::ACTIVITY_HEADING)
}

fn child_divs_with_class<'a>(parent: ElementRef<'a>, needle: &str) -> Vec<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| {
            child.value().name() == "div"
                && child
                    .value()
                    .attr("class")
                    .map(|class| class.contains(needle))
                    .unwrap_or(false)
        })
        .collect()
}

/// Extracts every suggested activity, in page order
pub fn activities(document: &Html) -> ExtractResult<Vec<ActivityItem>> {
    activity_sections(document)
        .into_iter()
        .map(activity_item)
        .collect()
}

fn activity_item(section: ElementRef<'_>) -> ExtractResult<ActivityItem> {
    let name = first_text_in(section, selectors::ACTIVITY_TITLE)?;
    let rating = parse_decimal(&first_text_in(section, selectors::ACTIVITY_RATING)?)?;
    let total_review_count = parse_count(&first_text_in(section, selectors::ACTIVITY_REVIEWS)?)?;
    let description = first_in(section, selectors::ACTIVITY_DESCRIPTION)?
        .map(|element| raw_text(&element))
        .unwrap_or_default();

    Ok(ActivityItem {
        name,
        rating,
        total_review_count,
        description,
    })
}
