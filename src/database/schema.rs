/// Idempotent DDL applied by `noteful migrate` and at server start.
/// Note references (`folder_id`, `tags`) carry no foreign keys; cascades on
/// folder and tag removal are performed by the services. Names use the "C"
/// collation so `ORDER BY name` is byte order, as in the in-memory store.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        fullname TEXT,
        password TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT users_username_key UNIQUE (username)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS folders (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        name TEXT COLLATE "C" NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT folders_user_id_name_key UNIQUE (user_id, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        name TEXT COLLATE "C" NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT tags_user_id_name_key UNIQUE (user_id, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        content TEXT,
        folder_id UUID,
        tags UUID[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS notes_user_id_updated_at_idx ON notes (user_id, updated_at DESC)",
    "CREATE INDEX IF NOT EXISTS notes_folder_id_idx ON notes (folder_id)",
    "CREATE INDEX IF NOT EXISTS notes_tags_idx ON notes USING GIN (tags)",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_and_tag_names_sort_in_byte_order() {
        for table in ["folders", "tags"] {
            let ddl = SCHEMA_STATEMENTS
                .iter()
                .find(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)))
                .unwrap();
            assert!(ddl.contains(r#"name TEXT COLLATE "C" NOT NULL"#), "{}", table);
        }
    }
}
