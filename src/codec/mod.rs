//! Text formats exchanged with the cut list service and the editor

pub mod candidate_xml;
pub mod cutlist_ini;
pub mod editor_project;

pub use candidate_xml::{extract_tags, split_candidates};
pub use cutlist_ini::{decode_timing_model, encode_timing_model, IniDocument, IniSection};
pub use editor_project::{parse_project, project_preamble, EditorProject};
