use crate::NodeId;

/// Base path of the embeddable design viewer
pub const EMBED_BASE_URL: &str = "https://embed.figma.com/design";

/// Display flags appended to every deep link
const EMBED_FLAGS: &str = "embed-host=share&footer=false&viewport-controls=false&page-selector=false";

/// Build the shareable deep link for a node.
///
/// The node is not checked for existence; the host resolves it when the
/// link is opened.
pub fn embed_url(file_key: &str, node_id: &NodeId) -> String {
    format!("{EMBED_BASE_URL}/{file_key}?node-id={node_id}&{EMBED_FLAGS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_url_shape() {
        let url = embed_url("AbC123", &NodeId::from("4:56"));
        assert_eq!(
            url,
            "https://embed.figma.com/design/AbC123?node-id=4:56&embed-host=share&footer=false&viewport-controls=false&page-selector=false"
        );
    }

    #[test]
    fn test_embed_url_is_stable() {
        let id = NodeId::from("9:1");
        assert_eq!(embed_url("key", &id), embed_url("key", &id));
    }
}
