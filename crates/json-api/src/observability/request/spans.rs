//! HTTP span helpers.

use uuid::Uuid;

/// Replace uuid path segments so routes group under one label.
pub(super) fn normalise_route(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_replaced() {
        assert_eq!(
            normalise_route("/orders/0190f1c2-7d7e-7a4b-9c3f-2b1a0e9d8c7b/payment"),
            "/orders/{uuid}/payment"
        );
    }

    #[test]
    fn plain_paths_are_kept() {
        assert_eq!(normalise_route("/cart/add"), "/cart/add");
        assert_eq!(normalise_route("/"), "/");
    }
}
