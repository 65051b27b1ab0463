pub mod content_xml;
pub mod dictionary_yaml;
