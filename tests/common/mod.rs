//! An in-memory stand-in for the external decompression engine, scripted
//! with the cabinets each test needs. Extraction writes the scripted bytes
//! to the destination path; bookkeeping counters let tests assert teardown
//! behavior.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use mscabd::consts;
use mscabd::{
    CabEngine, CabinetDesc, CabinetHandle, ContextHandle, DosDateTime, FileDesc,
    FileHandle,
};

#[derive(Clone)]
pub struct ScriptedFile {
    name: String,
    contents: Vec<u8>,
    attributes: u16,
    datetime: DosDateTime,
    extract_error: Option<i32>,
}

impl ScriptedFile {
    pub fn new(name: &str, contents: &[u8]) -> ScriptedFile {
        ScriptedFile {
            name: name.to_string(),
            contents: contents.to_vec(),
            attributes: consts::ATTR_ARCH,
            datetime: DosDateTime {
                year: 2004,
                month: 5,
                day: 6,
                hour: 7,
                minute: 8,
                second: 10,
            },
            extract_error: None,
        }
    }

    pub fn attributes(mut self, attributes: u16) -> ScriptedFile {
        self.attributes = attributes;
        self
    }

    pub fn datetime(mut self, datetime: DosDateTime) -> ScriptedFile {
        self.datetime = datetime;
        self
    }

    /// Makes every extraction of this file fail with `code`.
    pub fn extract_error(mut self, code: i32) -> ScriptedFile {
        self.extract_error = Some(code);
        self
    }
}

#[derive(Clone)]
pub struct ScriptedCabinet {
    set_id: u16,
    set_index: u16,
    flags: u16,
    prev_name: Option<String>,
    next_name: Option<String>,
    files: Vec<ScriptedFile>,
}

impl ScriptedCabinet {
    pub fn new(set_id: u16, set_index: u16) -> ScriptedCabinet {
        ScriptedCabinet {
            set_id,
            set_index,
            flags: 0,
            prev_name: None,
            next_name: None,
            files: Vec::new(),
        }
    }

    pub fn prev_disk(mut self, name: &str) -> ScriptedCabinet {
        self.flags |= consts::FLAG_PREV_CABINET;
        self.prev_name = Some(name.to_string());
        self
    }

    pub fn next_disk(mut self, name: &str) -> ScriptedCabinet {
        self.flags |= consts::FLAG_NEXT_CABINET;
        self.next_name = Some(name.to_string());
        self
    }

    pub fn file(mut self, file: ScriptedFile) -> ScriptedCabinet {
        self.files.push(file);
        self
    }
}

struct FileRecord {
    desc: FileDesc,
    contents: Vec<u8>,
    extract_error: Option<i32>,
}

struct CabRecord {
    desc: CabinetDesc,
    /// Set index of the last disk merged into this cabinet; appends must
    /// continue from here.
    last_index: u16,
}

#[derive(Default)]
struct State {
    next_id: u64,
    refuse_contexts: bool,
    contexts: Vec<u64>,
    last_error: HashMap<u64, i32>,
    cabinets: HashMap<u64, CabRecord>,
    files: HashMap<u64, FileRecord>,
    closed_cabinets: usize,
    destroyed_contexts: usize,
}

pub struct MemEngine {
    scripts: Mutex<HashMap<PathBuf, ScriptedCabinet>>,
    state: Mutex<State>,
}

impl MemEngine {
    pub fn new() -> MemEngine {
        MemEngine { scripts: Mutex::new(HashMap::new()), state: Mutex::new(State::default()) }
    }

    pub fn script(&self, path: impl Into<PathBuf>, cabinet: ScriptedCabinet) {
        self.scripts.lock().unwrap().insert(path.into(), cabinet);
    }

    /// Makes every later `create_context` call fail.
    pub fn refuse_contexts(&self) {
        self.state.lock().unwrap().refuse_contexts = true;
    }

    pub fn live_contexts(&self) -> usize {
        self.state.lock().unwrap().contexts.len()
    }

    pub fn destroyed_contexts(&self) -> usize {
        self.state.lock().unwrap().destroyed_contexts
    }

    pub fn closed_cabinets(&self) -> usize {
        self.state.lock().unwrap().closed_cabinets
    }
}

impl CabEngine for MemEngine {
    fn create_context(&self) -> Option<ContextHandle> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_contexts {
            return None;
        }
        state.next_id += 1;
        let id = state.next_id;
        state.contexts.push(id);
        Some(ContextHandle::from_raw(id))
    }

    fn destroy_context(&self, context: ContextHandle) {
        let mut state = self.state.lock().unwrap();
        state.contexts.retain(|&id| id != context.as_raw());
        state.destroyed_contexts += 1;
    }

    fn open(&self, context: ContextHandle, path: &Path) -> Option<CabinetHandle> {
        let script = match self.scripts.lock().unwrap().get(path) {
            Some(script) => script.clone(),
            None => {
                self.state
                    .lock()
                    .unwrap()
                    .last_error
                    .insert(context.as_raw(), consts::ERR_OPEN);
                return None;
            }
        };
        let mut state = self.state.lock().unwrap();
        let mut next = None;
        for file in script.files.iter().rev() {
            state.next_id += 1;
            let id = state.next_id;
            state.files.insert(
                id,
                FileRecord {
                    desc: FileDesc {
                        name: file.name.clone(),
                        length: file.contents.len() as u64,
                        attributes: file.attributes,
                        datetime: file.datetime,
                        next,
                    },
                    contents: file.contents.clone(),
                    extract_error: file.extract_error,
                },
            );
            next = Some(FileHandle::from_raw(id));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.cabinets.insert(
            id,
            CabRecord {
                desc: CabinetDesc {
                    flags: script.flags,
                    prev_name: script.prev_name.clone(),
                    next_name: script.next_name.clone(),
                    set_id: script.set_id,
                    set_index: script.set_index,
                    first_file: next,
                },
                last_index: script.set_index,
            },
        );
        Some(CabinetHandle::from_raw(id))
    }

    fn last_error(&self, context: ContextHandle) -> i32 {
        self.state
            .lock()
            .unwrap()
            .last_error
            .get(&context.as_raw())
            .copied()
            .unwrap_or(consts::ERR_OK)
    }

    fn close(&self, _context: ContextHandle, cabinet: CabinetHandle) {
        let mut state = self.state.lock().unwrap();
        if state.cabinets.remove(&cabinet.as_raw()).is_some() {
            state.closed_cabinets += 1;
        }
    }

    fn append(
        &self,
        context: ContextHandle,
        cabinet: CabinetHandle,
        next: CabinetHandle,
    ) -> i32 {
        let mut state = self.state.lock().unwrap();
        let (head_first, head_last, head_set) = match state.cabinets.get(&cabinet.as_raw())
        {
            Some(record) => (record.desc.first_file, record.last_index, record.desc.set_id),
            None => return consts::ERR_ARGS,
        };
        let (tail_first, tail_last, tail_set, tail_index) =
            match state.cabinets.get(&next.as_raw()) {
                Some(record) => (
                    record.desc.first_file,
                    record.last_index,
                    record.desc.set_id,
                    record.desc.set_index,
                ),
                None => return consts::ERR_ARGS,
            };
        if head_set != tail_set || tail_index != head_last + 1 {
            state.last_error.insert(context.as_raw(), consts::ERR_DATAFORMAT);
            return consts::ERR_DATAFORMAT;
        }
        if let Some(first) = head_first {
            let mut cursor = first;
            loop {
                let record = state.files.get(&cursor.as_raw()).expect("dangling file link");
                match record.desc.next {
                    Some(following) => cursor = following,
                    None => break,
                }
            }
            state.files.get_mut(&cursor.as_raw()).unwrap().desc.next = tail_first;
        }
        let merged_first = head_first.or(tail_first);
        let head = state.cabinets.get_mut(&cabinet.as_raw()).unwrap();
        head.desc.first_file = merged_first;
        head.last_index = tail_last;
        // the merged list is reachable from the appended side as well
        let tail = state.cabinets.get_mut(&next.as_raw()).unwrap();
        tail.desc.first_file = merged_first;
        consts::ERR_OK
    }

    fn extract(&self, _context: ContextHandle, file: FileHandle, dest: &Path) -> i32 {
        let (contents, scripted_failure) = {
            let state = self.state.lock().unwrap();
            match state.files.get(&file.as_raw()) {
                Some(record) => (record.contents.clone(), record.extract_error),
                None => return consts::ERR_ARGS,
            }
        };
        if let Some(code) = scripted_failure {
            return code;
        }
        match std::fs::write(dest, contents) {
            Ok(()) => consts::ERR_OK,
            Err(_) => consts::ERR_WRITE,
        }
    }

    fn cabinet(&self, context: ContextHandle, cabinet: CabinetHandle) -> Option<CabinetDesc> {
        let state = self.state.lock().unwrap();
        if !state.contexts.contains(&context.as_raw()) {
            return None;
        }
        state.cabinets.get(&cabinet.as_raw()).map(|record| record.desc.clone())
    }

    fn file(&self, context: ContextHandle, file: FileHandle) -> Option<FileDesc> {
        let state = self.state.lock().unwrap();
        if !state.contexts.contains(&context.as_raw()) {
            return None;
        }
        state.files.get(&file.as_raw()).map(|record| record.desc.clone())
    }
}
