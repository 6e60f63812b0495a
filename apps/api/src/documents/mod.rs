// Document CRUD — the keyed-collection collaborator behind the generation
// pipeline. All semantics live in `store`; handlers just wire HTTP to it.

pub mod handlers;
