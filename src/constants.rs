//! Common constants used throughout stemplate.

/// Extension marking files that are rendered when the source is a directory or a list
pub const DEFAULT_EXTENSION: &str = ".template";

/// Separator for source paths and for variable name lists
pub const LIST_SEPARATOR: char = ',';

/// Separator between key and value inside a map source item
pub const MAP_ITEM_SEPARATOR: char = '=';
