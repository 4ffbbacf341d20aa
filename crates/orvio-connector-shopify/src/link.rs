//! RFC-5988 `Link` header parsing for Shopify cursor pagination.
//!
//! Shopify returns the next page cursor only inside the `Link` response
//! header, as the `page_info` query parameter of the `rel="next"` URL:
//!
//! ```text
//! <https://x.myshopify.com/admin/api/2024-10/products.json?page_info=abc&limit=250>; rel="next"
//! ```

/// Extract the `page_info` cursor of the `rel="next"` link, if any.
pub fn next_page_info(link_header: &str) -> Option<String> {
    for part in link_header.split(',') {
        let part = part.trim();
        if !part.contains("rel=\"next\"") {
            continue;
        }

        let url = part.strip_prefix('<')?.split('>').next()?;
        let query = url.split_once('?')?.1;

        for param in query.split('&') {
            if let Some(value) = param.strip_prefix("page_info=") {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_next_cursor() {
        let header = "<https://x.myshopify.com/admin/api/2024-10/products.json?page_info=abc123&limit=250>; rel=\"next\"";
        assert_eq!(next_page_info(header), Some("abc123".to_string()));
    }

    #[test]
    fn test_prefers_next_over_previous() {
        let header = "<https://x.myshopify.com/admin/api/2024-10/products.json?page_info=prev999&limit=250>; rel=\"previous\", <https://x.myshopify.com/admin/api/2024-10/products.json?page_info=next111&limit=250>; rel=\"next\"";
        assert_eq!(next_page_info(header), Some("next111".to_string()));
    }

    #[test]
    fn test_no_next_means_exhausted() {
        let header = "<https://x.myshopify.com/admin/api/2024-10/products.json?page_info=prev999&limit=250>; rel=\"previous\"";
        assert_eq!(next_page_info(header), None);
        assert_eq!(next_page_info(""), None);
    }

    #[test]
    fn test_cursor_position_in_query_does_not_matter() {
        let header = "<https://x.myshopify.com/admin/api/2024-10/orders.json?limit=250&page_info=zz9>; rel=\"next\"";
        assert_eq!(next_page_info(header), Some("zz9".to_string()));
    }
}
