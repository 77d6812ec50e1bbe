// Managers module
// YAML configuration structures and the conversions that build widgets from them

pub mod error;
pub mod pager;
pub mod tab_bar;

pub use error::ConfigError;
pub use pager::{convert_pager_config, create_pager_from_config, PagerConfigYaml};
pub use tab_bar::{
    convert_tab_bar_config,
    create_tab_bar_from_config,
    FontConfigYaml,
    IndicatorWidthYaml,
    TabBarConfigYaml,
};
