#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    ContentDecode,
    ContentEncode,
    ContentOpen,
    ContentSave,
    ContentSaveAs,
    ContentTransfer,
    ContentClose,
    EntriesList,
    EntryEdit,
    DictApply,
    DictSave,
    DictImport,
    DictExport,
    SettingsGet,
    SettingsSet,
    SessionGet,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "content.decode" => Command::ContentDecode,
            "content.encode" => Command::ContentEncode,
            "content.open" => Command::ContentOpen,
            "content.save" => Command::ContentSave,
            "content.save_as" => Command::ContentSaveAs,
            "content.transfer" => Command::ContentTransfer,
            "content.close" => Command::ContentClose,
            "entries.list" => Command::EntriesList,
            "entry.edit" => Command::EntryEdit,
            "dict.apply" => Command::DictApply,
            "dict.save" => Command::DictSave,
            "dict.import" => Command::DictImport,
            "dict.export" => Command::DictExport,
            "settings.get" => Command::SettingsGet,
            "settings.set" => Command::SettingsSet,
            "session.get" => Command::SessionGet,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}
