use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::debug;

use crate::model::entry::{ContentRecord, EntryView};
use crate::model::session::SessionState;
use crate::model::settings::Settings;
use crate::model::status::Status;
use crate::parsers::content_xml;
use crate::services::{encoding, search, settings as settings_service, workspace};

mod command;
pub use command::Command;

/// Everything a request can touch. Owned by the process loop.
pub struct Context {
    pub session: SessionState,
    pub settings: Settings,
    pub settings_path: PathBuf,
}

impl Context {
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            session: SessionState::new(),
            settings,
            settings_path,
        }
    }

    /// Context backed by the user's settings file.
    pub fn load() -> Self {
        Self::new(settings_service::load(), settings_service::settings_path())
    }
}

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn session_reply(id: Value, ctx: &Context, status: Status) -> String {
    ok(
        id,
        json!({
            "message": status,
            "session": ctx.session.summary()
        }),
    )
}

fn parse_records_from_payload(payload: &Value) -> Result<Vec<ContentRecord>, String> {
    let arr = payload
        .get("entries")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "payload.entries must be an array".to_string())?;

    let mut records: Vec<ContentRecord> = Vec::with_capacity(arr.len());

    for (i, v) in arr.iter().cloned().enumerate() {
        match serde_json::from_value::<ContentRecord>(v) {
            Ok(r) => records.push(r),
            Err(e) => return Err(format!("invalid entry at index {}: {}", i, e)),
        }
    }

    Ok(records)
}

fn required_path(payload: &Value) -> Result<PathBuf, String> {
    let p = get_str(payload, "path");
    if p.is_empty() {
        return Err("payload.path is required".into());
    }
    Ok(PathBuf::from(p))
}

pub fn handle(ctx: &mut Context, input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    debug!(cmd = cmd_str, "request");

    match Command::from(cmd_str) {
        Command::Ping => ok(id, json!({ "message": "loca-core alive" })),

        Command::ContentDecode => {
            let text = get_str(payload, "text");
            match content_xml::decode(text) {
                Ok(records) => ok(id, json!({ "entries": records })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::ContentEncode => {
            let records = match parse_records_from_payload(payload) {
                Ok(v) => v,
                Err(e) => return err(id, e),
            };
            ok(id, json!({ "text": content_xml::encode(&records) }))
        }

        Command::ContentOpen => {
            let path = match required_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let status = workspace::open_content(&mut ctx.session, &ctx.settings, &path);
            session_reply(id, ctx, status)
        }

        Command::ContentSave => {
            let status = workspace::save_content(&mut ctx.session);
            session_reply(id, ctx, status)
        }

        Command::ContentSaveAs => {
            let path = match required_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let status = workspace::save_content_as(&mut ctx.session, &path);
            session_reply(id, ctx, status)
        }

        Command::ContentTransfer => {
            let path = match required_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let status = workspace::transfer_from(&mut ctx.session, &path);
            session_reply(id, ctx, status)
        }

        Command::ContentClose => {
            let status = workspace::close(&mut ctx.session);
            session_reply(id, ctx, status)
        }

        Command::EntriesList => {
            let query = get_str(payload, "query");
            let entries = ctx.session.entries();
            let rows: Vec<EntryView> = search::filter(entries, query)
                .into_iter()
                .map(EntryView::from)
                .collect();
            ok(
                id,
                json!({
                    "entries": rows,
                    "progress": search::progress(entries)
                }),
            )
        }

        Command::EntryEdit => {
            let Some(position) = payload.get("position").and_then(|v| v.as_u64()) else {
                return err(id, "payload.position is required");
            };
            let Some(text) = payload.get("text").and_then(|v| v.as_str()) else {
                return err(id, "payload.text is required");
            };
            let status = workspace::edit_entry(&mut ctx.session, position as usize, text);
            session_reply(id, ctx, status)
        }

        Command::DictApply => {
            let status = workspace::apply_master(&mut ctx.session, &ctx.settings);
            session_reply(id, ctx, status)
        }

        Command::DictSave => {
            let status = workspace::save_master(&mut ctx.session, &ctx.settings);
            session_reply(id, ctx, status)
        }

        Command::DictImport => {
            let path = match required_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let status = workspace::import_dictionary(&mut ctx.session, &path);
            session_reply(id, ctx, status)
        }

        Command::DictExport => {
            let path = match required_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let status = workspace::export_dictionary(&mut ctx.session, &path);
            session_reply(id, ctx, status)
        }

        Command::SettingsGet => ok(id, json!({ "settings": ctx.settings })),

        Command::SettingsSet => {
            if let Some(auto) = payload.get("auto_apply").and_then(|v| v.as_bool()) {
                ctx.settings.auto_apply = auto;
            }
            let dict_path = get_str(payload, "dictionary_path");
            if !dict_path.is_empty() {
                ctx.settings.dictionary_path = PathBuf::from(dict_path);
            }

            let status = match settings_service::save_to(&ctx.settings_path, &ctx.settings) {
                Ok(()) => Status::success("settings saved"),
                Err(e) => Status::error(format!("error: {e}")),
            };
            ok(id, json!({ "settings": ctx.settings, "message": status }))
        }

        Command::SessionGet => ok(id, json!({ "session": ctx.session.summary() })),

        Command::DetectEncoding => {
            let path_str = get_str(payload, "path");
            if path_str.is_empty() {
                return err(id, "payload.path is required");
            }
            match encoding::detect_from_file(Path::new(path_str)) {
                Ok(result) => ok(id, serde_json::to_value(result).unwrap_or(json!({}))),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Unknown => err(id, "unknown command"),
    }
}
