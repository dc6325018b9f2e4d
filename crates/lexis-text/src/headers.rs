use std::collections::{HashMap, HashSet};

use crate::normalize::unify_line_endings;
use crate::RawPage;

/// Remove running headers and footers from a multi-page document.
///
/// The first and last non-empty line of every page are pooled; any line seen
/// on more than one page is treated as an artifact and every occurrence of it
/// is removed from every page. Documents with fewer than two pages are
/// returned unchanged.
///
/// Unlike a plain pooled count, a line that is both the first and the last
/// line of one page counts once for that page, so a single-line page never
/// matches itself.
///
/// A legitimately repeated short line (a refrain, a repeated heading) will be
/// stripped too.
pub fn strip_headers_footers(pages: &[RawPage]) -> Vec<RawPage> {
    if pages.len() < 2 {
        return pages.to_vec();
    }

    let unified: Vec<String> = pages.iter().map(|p| unify_line_endings(p.as_str())).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for page in &unified {
        let mut non_empty = page.lines().map(str::trim).filter(|l| !l.is_empty());
        let first = non_empty.next();
        let last = non_empty.next_back().or(first);

        // A page whose first and last line coincide counts once.
        let boundary: HashSet<&str> = first.into_iter().chain(last).collect();
        for line in boundary {
            *counts.entry(line).or_default() += 1;
        }
    }

    let artifacts: HashSet<&str> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(line, _)| line)
        .collect();

    if artifacts.is_empty() {
        return pages.to_vec();
    }

    tracing::debug!(artifacts = artifacts.len(), pages = pages.len(), "Stripping running headers/footers");

    unified
        .iter()
        .map(|page| {
            let kept: Vec<&str> = page
                .lines()
                .filter(|line| !artifacts.contains(line.trim()))
                .collect();
            RawPage::new(kept.join("\n"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<RawPage> {
        texts.iter().map(|t| RawPage::from(*t)).collect()
    }

    #[test]
    fn test_single_page_unchanged() {
        let input = pages(&["Header\nBody\nFooter"]);
        assert_eq!(strip_headers_footers(&input), input);
    }

    #[test]
    fn test_repeated_header_and_footer_removed() {
        let input = pages(&[
            "Biology 101\nCells are small.\nPage footer",
            "  Biology 101  \r\nThey divide.\r\nPage footer",
            "Biology 101\nATP is energy.\nPage footer",
        ]);
        let output = strip_headers_footers(&input);
        assert_eq!(output[0].as_str(), "Cells are small.");
        assert_eq!(output[1].as_str(), "They divide.");
        assert_eq!(output[2].as_str(), "ATP is energy.");
    }

    #[test]
    fn test_artifact_removed_from_page_interior_too() {
        let input = pages(&[
            "Chapter 1\nIntro text.",
            "Chapter 1\nMore text.\nChapter 1\nEven more.",
        ]);
        let output = strip_headers_footers(&input);
        assert_eq!(output[1].as_str(), "More text.\nEven more.");
    }

    #[test]
    fn test_distinct_boundaries_kept() {
        let input = pages(&["Alpha\nBeta", "Gamma\nDelta"]);
        assert_eq!(strip_headers_footers(&input), input);
    }

    #[test]
    fn test_single_line_page_not_self_matching() {
        let input = pages(&["Only line", "Other\npage"]);
        assert_eq!(strip_headers_footers(&input), input);
    }
}
