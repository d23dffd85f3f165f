mod helper;
mod invalid_json;
mod root;
