// Table declarations for the core schema. Kept in sync with the
// migrations under migrations/.

diesel::table! {
    project_files (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    generic_files (id) {
        id -> Nullable<Integer>,
        project_file_id -> Nullable<Integer>,
        text -> Nullable<Text>,
        binary -> Nullable<Binary>,
        name -> Text,
        file_extension -> Text,
    }
}

diesel::joinable!(generic_files -> project_files (project_file_id));

diesel::allow_tables_to_appear_in_same_query!(generic_files, project_files);
