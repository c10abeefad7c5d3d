use crate::core::config::Config;
use crate::core::mirror::MirrorManager;
use crate::core::store::MirrorEntry;
use crate::error::Result;
use crate::utils::fs::shorten_path;

pub fn list_files(config: Config, json: bool) -> Result<()> {
    let manager = MirrorManager::open(config)?;
    let entries = manager.store().list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render_table(&entries));
    }
    Ok(())
}

fn render_table(entries: &[MirrorEntry]) -> String {
    let mut out = String::from("Mirrors:\n");
    if entries.is_empty() {
        out.push_str("None\n");
    }
    for entry in entries {
        out.push_str(&format!(
            "{:30} {}\n",
            shorten_path(&entry.filename),
            entry.url
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_render_empty() {
        assert_eq!(render_table(&[]), "Mirrors:\nNone\n");
    }

    #[test]
    fn test_render_rows() {
        let entries = vec![MirrorEntry {
            filename: PathBuf::from("/opt/mirror/tool"),
            url: "https://example.com/tool".to_string(),
            archive_filename: None,
            post_install: None,
        }];
        assert_eq!(
            render_table(&entries),
            "Mirrors:\n/opt/mirror/tool               https://example.com/tool\n"
        );
    }

    #[test]
    fn test_entries_serialize_to_json() {
        let entries = vec![MirrorEntry {
            filename: PathBuf::from("/opt/mirror/tool"),
            url: "https://example.com/tool.zip".to_string(),
            archive_filename: Some("tool".to_string()),
            post_install: None,
        }];
        let value = serde_json::to_value(&entries).unwrap();
        assert_eq!(value[0]["filename"], "/opt/mirror/tool");
        assert_eq!(value[0]["archive_filename"], "tool");
        assert!(value[0]["post_install"].is_null());
    }
}
