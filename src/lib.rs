//! Interaction core for the jamboard collaborative whiteboard.
//!
//! The crate owns everything behind the canvas: the object store for sticky
//! notes, text, shapes, ink and chat; the tool state machine; the pointer
//! session that turns press/move/release into board mutations; and the AI
//! adapter that fills in icebreakers and session reports. A presentation
//! layer feeds discrete [`engine::Event`]s in and draws the
//! [`render::BoardSnapshot`] it gets back. It holds no state of its own.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::BoardCore`] reducer: events in, actions out |
//! | [`doc`] | Board object types and the in-memory object store |
//! | [`input`] | Tools, the per-tool metadata table, and the pointer session |
//! | [`hit`] | Eraser hit-testing against ink and shape outlines |
//! | [`geom`] | Points and normalized bounding boxes |
//! | [`timer`] | Session countdown timer |
//! | [`render`] | Snapshot type and SVG drawing-layer markup |
//! | [`ai`] | Icebreaker and session report requests over [`llm`] |
//! | [`llm`] | Provider-neutral LLM chat client (Anthropic, `OpenAI`) |
//! | [`error`] | Stable error codes shared by the error enums |
//! | [`consts`] | Palette, ink styles, placement offsets, limits |

pub mod ai;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geom;
pub mod hit;
pub mod input;
pub mod llm;
pub mod render;
pub mod timer;
