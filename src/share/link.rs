use url::Url;

/// Query parameter carrying the selected track's slug.
pub const TRACK_PARAM: &str = "track";

/// The public page link for the player, kept in sync with the selected track.
///
/// Replacing the parameter never "navigates": it only rewrites the query so the
/// link shown and copied always points at what is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    url: Url,
}

impl ShareLink {
    pub fn parse(s: &str) -> Result<Self, url::ParseError> {
        Url::parse(s).map(|url| Self { url })
    }

    /// Build the startup link from the configured `base` and the optional deep-link
    /// argument, which may be a full link (its `track` parameter wins) or a bare slug.
    pub fn from_arg(base: &str, arg: Option<&str>) -> Result<Self, url::ParseError> {
        let mut link = Self::parse(base)?;
        let Some(arg) = arg.map(str::trim).filter(|a| !a.is_empty()) else {
            return Ok(link);
        };

        match Url::parse(arg) {
            Ok(url) if url.scheme().len() > 1 => {
                let slug = Self { url }.track_param();
                if let Some(slug) = slug {
                    link.replace_track(&slug);
                }
            }
            _ => link.replace_track(arg),
        }
        Ok(link)
    }

    pub fn track_param(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == TRACK_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// Set the `track` parameter, keeping every other parameter and its position.
    pub fn replace_track(&mut self, slug: &str) {
        let mut pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        match pairs.iter_mut().find(|(k, _)| k == TRACK_PARAM) {
            Some(pair) => pair.1 = slug.to_string(),
            None => pairs.push((TRACK_PARAM.to_string(), slug.to_string())),
        }
        // Drop any repeated `track` keys after the first.
        let mut seen = false;
        pairs.retain(|(k, _)| {
            if k != TRACK_PARAM {
                return true;
            }
            let keep = !seen;
            seen = true;
            keep
        });

        self.url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// HTML snippet that embeds the player at this link.
    pub fn embed_snippet(&self, width: &str, height: u32) -> String {
        format!(
            r#"<iframe src="{}" width="{}" height="{}" frameborder="0" allow="autoplay" style="border-radius: 1rem;"></iframe>"#,
            self.url, width, height
        )
    }
}
