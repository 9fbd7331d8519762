// Job description management: upload, read, replace, delete.

pub mod handlers;
