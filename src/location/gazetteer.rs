//! Reference tables: city coordinates and province aliases.
//!
//! The built-in dataset covers every provincial-level division of China
//! plus its capital and a few other large cities. A replacement table can
//! be loaded from JSON:
//!
//! ```json
//! {
//!   "cities":  { "北京": { "coordinates": [39.9042, 116.4074], "province": "北京" } },
//!   "aliases": { "广东省": "广东" }
//! }
//! ```

use super::types::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinCity {
    name: &'static str,
    lat: f64,
    lon: f64,
    province: &'static str,
}

const BUILTIN_CITIES: &[BuiltinCity] = &[
    BuiltinCity { name: "北京", lat: 39.9042, lon: 116.4074, province: "北京" },
    BuiltinCity { name: "上海", lat: 31.2304, lon: 121.4737, province: "上海" },
    BuiltinCity { name: "天津", lat: 39.3434, lon: 117.3616, province: "天津" },
    BuiltinCity { name: "重庆", lat: 29.5630, lon: 106.5516, province: "重庆" },
    BuiltinCity { name: "广州", lat: 23.1291, lon: 113.2644, province: "广东" },
    BuiltinCity { name: "深圳", lat: 22.5431, lon: 114.0579, province: "广东" },
    BuiltinCity { name: "成都", lat: 30.5728, lon: 104.0668, province: "四川" },
    BuiltinCity { name: "杭州", lat: 30.2741, lon: 120.1551, province: "浙江" },
    BuiltinCity { name: "南京", lat: 32.0603, lon: 118.7969, province: "江苏" },
    BuiltinCity { name: "苏州", lat: 31.2989, lon: 120.5853, province: "江苏" },
    BuiltinCity { name: "武汉", lat: 30.5928, lon: 114.3055, province: "湖北" },
    BuiltinCity { name: "西安", lat: 34.3416, lon: 108.9398, province: "陕西" },
    BuiltinCity { name: "长沙", lat: 28.2282, lon: 112.9388, province: "湖南" },
    BuiltinCity { name: "郑州", lat: 34.7466, lon: 113.6254, province: "河南" },
    BuiltinCity { name: "济南", lat: 36.6512, lon: 117.1201, province: "山东" },
    BuiltinCity { name: "青岛", lat: 36.0671, lon: 120.3826, province: "山东" },
    BuiltinCity { name: "沈阳", lat: 41.8057, lon: 123.4315, province: "辽宁" },
    BuiltinCity { name: "大连", lat: 38.9140, lon: 121.6147, province: "辽宁" },
    BuiltinCity { name: "哈尔滨", lat: 45.8038, lon: 126.5349, province: "黑龙江" },
    BuiltinCity { name: "长春", lat: 43.8171, lon: 125.3235, province: "吉林" },
    BuiltinCity { name: "石家庄", lat: 38.0428, lon: 114.5149, province: "河北" },
    BuiltinCity { name: "太原", lat: 37.8706, lon: 112.5489, province: "山西" },
    BuiltinCity { name: "呼和浩特", lat: 40.8426, lon: 111.7492, province: "内蒙古" },
    BuiltinCity { name: "合肥", lat: 31.8206, lon: 117.2272, province: "安徽" },
    BuiltinCity { name: "福州", lat: 26.0745, lon: 119.2965, province: "福建" },
    BuiltinCity { name: "厦门", lat: 24.4798, lon: 118.0894, province: "福建" },
    BuiltinCity { name: "南昌", lat: 28.6820, lon: 115.8579, province: "江西" },
    BuiltinCity { name: "南宁", lat: 22.8170, lon: 108.3665, province: "广西" },
    BuiltinCity { name: "海口", lat: 20.0440, lon: 110.1999, province: "海南" },
    BuiltinCity { name: "三亚", lat: 18.2528, lon: 109.5119, province: "海南" },
    BuiltinCity { name: "贵阳", lat: 26.6470, lon: 106.6302, province: "贵州" },
    BuiltinCity { name: "昆明", lat: 25.0389, lon: 102.7183, province: "云南" },
    BuiltinCity { name: "拉萨", lat: 29.6520, lon: 91.1721, province: "西藏" },
    BuiltinCity { name: "兰州", lat: 36.0611, lon: 103.8343, province: "甘肃" },
    BuiltinCity { name: "西宁", lat: 36.6171, lon: 101.7782, province: "青海" },
    BuiltinCity { name: "银川", lat: 38.4872, lon: 106.2309, province: "宁夏" },
    BuiltinCity { name: "乌鲁木齐", lat: 43.8256, lon: 87.6168, province: "新疆" },
    BuiltinCity { name: "香港", lat: 22.3193, lon: 114.1694, province: "香港" },
    BuiltinCity { name: "澳门", lat: 22.1987, lon: 113.5439, province: "澳门" },
    BuiltinCity { name: "台北", lat: 25.0330, lon: 121.5654, province: "台湾" },
];

/// Full official name → short name used by the boundary dataset.
const PROVINCE_ALIASES: &[(&str, &str)] = &[
    ("北京市", "北京"),
    ("天津市", "天津"),
    ("上海市", "上海"),
    ("重庆市", "重庆"),
    ("河北省", "河北"),
    ("山西省", "山西"),
    ("辽宁省", "辽宁"),
    ("吉林省", "吉林"),
    ("黑龙江省", "黑龙江"),
    ("江苏省", "江苏"),
    ("浙江省", "浙江"),
    ("安徽省", "安徽"),
    ("福建省", "福建"),
    ("江西省", "江西"),
    ("山东省", "山东"),
    ("河南省", "河南"),
    ("湖北省", "湖北"),
    ("湖南省", "湖南"),
    ("广东省", "广东"),
    ("海南省", "海南"),
    ("四川省", "四川"),
    ("贵州省", "贵州"),
    ("云南省", "云南"),
    ("陕西省", "陕西"),
    ("甘肃省", "甘肃"),
    ("青海省", "青海"),
    ("台湾省", "台湾"),
    ("内蒙古自治区", "内蒙古"),
    ("广西壮族自治区", "广西"),
    ("西藏自治区", "西藏"),
    ("宁夏回族自治区", "宁夏"),
    ("新疆维吾尔自治区", "新疆"),
    ("香港特别行政区", "香港"),
    ("澳门特别行政区", "澳门"),
];

// ─── Tables ─────────────────────────────────────────────────────

/// Coordinates and containing province of a known city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub coordinates: Coordinates,
    pub province: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GazetteerError {
    #[error("cannot read gazetteer {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid gazetteer {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct GazetteerFile {
    #[serde(default)]
    cities: HashMap<String, CityRecord>,
    #[serde(default)]
    aliases: HashMap<String, String>,
}

/// Immutable lookup tables consulted by the resolver.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    cities: HashMap<String, CityRecord>,
    aliases: HashMap<String, String>,
    canonical: BTreeSet<String>,
}

impl Gazetteer {
    /// An empty table set; populate with `with_city` / `with_alias`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in dataset.
    pub fn builtin() -> Self {
        let cities = BUILTIN_CITIES
            .iter()
            .map(|c| {
                (
                    c.name.to_string(),
                    CityRecord {
                        coordinates: (c.lat, c.lon),
                        province: c.province.to_string(),
                    },
                )
            })
            .collect();
        let aliases = PROVINCE_ALIASES
            .iter()
            .map(|(alias, short)| (alias.to_string(), short.to_string()))
            .collect();
        Self::from_tables(cities, aliases)
    }

    /// Load a replacement dataset from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, GazetteerError> {
        let data = fs::read_to_string(path).map_err(|source| GazetteerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: GazetteerFile = serde_json::from_str(&data).map_err(|source| GazetteerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            cities = file.cities.len(),
            aliases = file.aliases.len(),
            "loaded gazetteer"
        );
        Ok(Self::from_tables(file.cities, file.aliases))
    }

    fn from_tables(cities: HashMap<String, CityRecord>, aliases: HashMap<String, String>) -> Self {
        let canonical = aliases.values().cloned().collect();
        Self { cities, aliases, canonical }
    }

    pub fn with_city(mut self, name: &str, coordinates: Coordinates, province: &str) -> Self {
        self.cities.insert(
            name.to_string(),
            CityRecord { coordinates, province: province.to_string() },
        );
        self
    }

    pub fn with_alias(mut self, alias: &str, short: &str) -> Self {
        self.aliases.insert(alias.to_string(), short.to_string());
        self.canonical.insert(short.to_string());
        self
    }

    pub fn city(&self, name: &str) -> Option<&CityRecord> {
        self.cities.get(name)
    }

    /// Short name an alias maps to.
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Whether `name` is a canonical short name (a value of the alias table).
    pub fn is_canonical(&self, name: &str) -> bool {
        self.canonical.contains(name)
    }

    /// Known city names, sorted (for autocomplete).
    pub fn city_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Canonical province short names, sorted.
    pub fn province_names(&self) -> impl Iterator<Item = &str> {
        self.canonical.iter().map(String::as_str)
    }
}
