//! Filesystem layout derived from a home directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::schema::LayoutConfig;

/// Absolute locations of the engine's files under one home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub mmdb: PathBuf,
    pub asn: PathBuf,
    pub geosite: PathBuf,
    pub geoip: PathBuf,
}

impl HomeLayout {
    pub fn new(home: &Path, names: &LayoutConfig) -> Self {
        Self {
            home: home.to_path_buf(),
            config_file: home.join(&names.config_file),
            mmdb: home.join(&names.mmdb),
            asn: home.join(&names.asn),
            geosite: home.join(&names.geosite),
            geoip: home.join(&names.geoip),
        }
    }

    /// Geo dataset files in a fixed order: MMDB, ASN, GeoSite, GeoIP.
    pub fn datasets(&self) -> [&Path; 4] {
        [&self.mmdb, &self.asn, &self.geosite, &self.geoip]
    }

    /// Unique parent directories of the geo datasets.
    pub fn dataset_dirs(&self) -> Vec<PathBuf> {
        self.datasets()
            .iter()
            .filter_map(|p| p.parent())
            .map(Path::to_path_buf)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let layout = HomeLayout::new(Path::new("/srv/proxy"), &LayoutConfig::default());
        assert_eq!(layout.config_file, PathBuf::from("/srv/proxy/config.yaml"));
        assert_eq!(layout.mmdb, PathBuf::from("/srv/proxy/geoip.metadb"));
        assert_eq!(layout.asn, PathBuf::from("/srv/proxy/GeoLite2-ASN.mmdb"));
        assert_eq!(layout.geosite, PathBuf::from("/srv/proxy/GeoSite.dat"));
        assert_eq!(layout.geoip, PathBuf::from("/srv/proxy/GeoIP.dat"));
        assert_eq!(layout.dataset_dirs(), vec![PathBuf::from("/srv/proxy")]);
    }

    #[test]
    fn test_dataset_dirs_deduplicated() {
        let names = LayoutConfig {
            geosite: "geo/GeoSite.dat".to_string(),
            geoip: "geo/GeoIP.dat".to_string(),
            ..LayoutConfig::default()
        };
        let layout = HomeLayout::new(Path::new("/h"), &names);
        assert_eq!(
            layout.dataset_dirs(),
            vec![PathBuf::from("/h"), PathBuf::from("/h/geo")]
        );
    }
}
