use crate::dataset::PluginRecord;

/// Strings upstream uses to mean "no URL here".
const ABSENT_SENTINELS: &[&str] = &["n/a", "none", "nan", ""];

/// Homepage link row: the package-index anchor always renders; the
/// source-hosting and other-homepage anchors render only when their URL
/// is present and not an absence sentinel.
pub fn extract(record: &PluginRecord) -> String {
    let home_pypi = record.home_pypi.as_deref().unwrap_or("");

    let mut html = format!(
        "<div class=\"flex items-center\" style=\"gap: 10px; align-items: center;\">\n\
         <a href=\"{home_pypi}\" rel=\"noreferrer\" target=\"_blank\">\n\
         <img src=\"../static/images/PyPI_logo.svg.png\" alt=\"PyPI\" style=\"height: 42px;\" />\n\
         </a>\n"
    );

    if let Some(home_github) = meaningful(record.home_github.as_deref()) {
        html.push_str(&format!(
            "<a href=\"{home_github}\" rel=\"noreferrer\" target=\"_blank\">\n\
             <img src=\"../static/images/GitHub_Invertocat_Logo.svg.png\" alt=\"GitHub\" style=\"height: 42px;\" />\n\
             </a>\n"
        ));
    }

    if let Some(home_other) = meaningful(record.home_other.as_deref()) {
        html.push_str(&format!(
            "<a href=\"{home_other}\" rel=\"noreferrer\" target=\"_blank\">\n\
             <svg width=\"21\" height=\"21\" viewBox=\"0 0 21 21\" fill=\"none\" xmlns=\"http://www.w3.org/2000/svg\">\n\
             <circle cx=\"10.8331\" cy=\"10.0835\" r=\"9.33333\" stroke=\"#000\" stroke-width=\"1.33333\"></circle>\n\
             <path d=\"M15.4998 10.0835C15.4998 12.7576 14.9202 15.1456 14.0161 16.8408C13.0967 18.5648 11.9398 19.4168 10.8331 19.4168C9.7264 19.4168 8.56951 18.5648 7.65009 16.8408C6.74594 15.1456 6.16642 12.7576 6.16642 10.0835C6.16642 7.40935 6.74594 5.02142 7.65009 3.32615C8.56951 1.60224 9.7264 0.750163 10.8331 0.750163C11.9398 0.750163 13.0967 1.60224 14.0161 3.32615C14.9202 5.02142 15.4998 7.40935 15.4998 10.0835Z\" stroke=\"#000\" stroke-width=\"1.33333\"></path>\n\
             <path d=\"M10.8331 0.270996V19.896\" stroke=\"#000\" stroke-width=\"1.33333\"></path>\n\
             <path d=\"M1.02063 10.0835L20.6456 10.0835\" stroke=\"#000\" stroke-width=\"1.33333\"></path>\n\
             </svg>\n\
             </a>\n"
        ));
    }

    html.push_str("</div>");
    html
}

fn meaningful(value: Option<&str>) -> Option<&str> {
    let value = value?;
    let lowered = value.trim().to_lowercase();
    if ABSENT_SENTINELS.contains(&lowered.as_str()) {
        None
    } else {
        Some(value)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pypi_anchor_always_present() {
        let html = extract(&PluginRecord::default());
        assert!(html.contains("alt=\"PyPI\""));
        assert!(!html.contains("alt=\"GitHub\""));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn sentinel_github_url_is_skipped() {
        for sentinel in ["None", "none", "N/A", "nan", ""] {
            let record = PluginRecord {
                home_pypi: Some("https://pypi.org/project/demo".to_string()),
                home_github: Some(sentinel.to_string()),
                ..Default::default()
            };
            assert!(
                !extract(&record).contains("alt=\"GitHub\""),
                "sentinel {sentinel:?} produced a GitHub anchor"
            );
        }
    }

    #[test]
    fn real_github_url_produces_one_anchor() {
        let record = PluginRecord {
            home_pypi: Some("https://pypi.org/project/demo".to_string()),
            home_github: Some("https://github.com/demo/demo".to_string()),
            ..Default::default()
        };
        let html = extract(&record);
        assert_eq!(html.matches("alt=\"GitHub\"").count(), 1);
        assert!(html.contains("href=\"https://github.com/demo/demo\""));
    }

    #[test]
    fn other_homepage_renders_globe_anchor() {
        let record = PluginRecord {
            home_other: Some("https://demo.example.org".to_string()),
            ..Default::default()
        };
        let html = extract(&record);
        assert!(html.contains("href=\"https://demo.example.org\""));
        assert!(html.contains("<svg"));
    }
}
