//! Integration test: end-to-end synthesis scenarios over a small
//! user/post/profile registry, covering filters, logical and relational
//! operators, enum narrowing, relation expansion and write operations.

use zscope_core::{
    AllowEntry, AllowList, FieldOverride, Field, Model, ModelRegistry, SynonymTable, TypeOverride,
};
use zscope_schema::{build_sections, expand_model, generate, SchemaContext, Trail};

fn registry() -> ModelRegistry {
    ModelRegistry::new()
        .with_model(
            "user",
            Model::new()
                .with_field("id", Field::new("String").id())
                .with_field("name", Field::new("String"))
                .with_field("email", Field::new("String"))
                .with_field("age", Field::new("Int"))
                .with_field("posts", Field::new("post").optional().list())
                .with_field("profile", Field::new("profile").optional())
                .with_field("status", Field::new("userStatus")),
        )
        .with_model(
            "post",
            Model::new()
                .with_field("id", Field::new("String"))
                .with_field("title", Field::new("String"))
                .with_field("content", Field::new("String").optional())
                .with_field("createdAt", Field::new("DateTime"))
                .with_field("author", Field::new("profile")),
        )
        .with_model(
            "profile",
            Model::new()
                .with_field("id", Field::new("String").id())
                .with_field("bio", Field::new("String").optional())
                .with_field("user", Field::new("user")),
        )
        .with_enum("userStatus", ["ACTIVE", "INACTIVE", "SUSPENDED"])
}

fn synonyms() -> SynonymTable {
    SynonymTable::new()
        .with_aliases("post", ["posts"])
        .with_aliases("profile", ["author"])
}

/// Render every section for `model` with the given allow list.
fn sections(
    registry: &ModelRegistry,
    synonyms: &SynonymTable,
    allow: &AllowList,
    model: &str,
) -> Vec<(String, String)> {
    let ctx = SchemaContext::new(registry, synonyms, allow);
    build_sections(&ctx, model)
        .expect("target model should exist")
        .into_iter()
        .map(|(k, v)| (k, v.into_string()))
        .collect()
}

fn section(paths: &[&str], model: &str, name: &str) -> Option<String> {
    let allow = AllowList::from_paths(paths.iter().copied());
    sections(&registry(), &synonyms(), &allow, model)
        .into_iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn test_simple_where_clause() {
    assert_eq!(
        section(&["where.id"], "user", "where").as_deref(),
        Some("z.object({ id: z.string() })")
    );
}

#[test]
fn test_logical_operators_wrap_in_arrays() {
    let got = section(
        &[
            "where.AND[].age",
            "where.AND[].status.in",
            "where.OR[].name",
            "where.NOT[].email",
        ],
        "user",
        "where",
    );
    assert_eq!(
        got.as_deref(),
        Some(
            r#"z.object({ AND: z.array(z.object({ age: z.number().int(), status: z.object({ in: z.array(z.enum(["ACTIVE","INACTIVE","SUSPENDED"])) }) })), OR: z.array(z.object({ name: z.string() })), NOT: z.array(z.object({ email: z.string() })) })"#
        )
    );
}

#[test]
fn test_logical_operators_without_list_marker() {
    assert_eq!(
        section(&["where.AND.age", "where.OR.name"], "user", "where").as_deref(),
        Some("z.object({ AND: z.array(z.object({ age: z.number().int() })), OR: z.array(z.object({ name: z.string() })) })")
    );
}

#[test]
fn test_relational_quantifiers() {
    assert_eq!(
        section(&["where.posts.some.title", "where.posts.every.id"], "user", "where").as_deref(),
        Some("z.object({ posts: z.object({ some: z.object({ title: z.string() }), every: z.object({ id: z.string() }) }) })")
    );
}

#[test]
fn test_nested_relations_through_synonyms() {
    assert_eq!(
        section(&["where.posts.some.author.user.name"], "user", "where").as_deref(),
        Some("z.object({ posts: z.object({ some: z.object({ author: z.object({ user: z.object({ name: z.string() }) }) }) }) })")
    );
    assert_eq!(
        section(&["where.posts.some.author.bio"], "user", "where").as_deref(),
        Some("z.object({ posts: z.object({ some: z.object({ author: z.object({ bio: z.string().nullish() }) }) }) })")
    );
}

#[test]
fn test_quantifier_without_synonyms() {
    let allow = AllowList::from_paths(["where.posts.none.title"]);
    let got = sections(&registry(), &SynonymTable::new(), &allow, "user");
    assert_eq!(
        got,
        [(
            "where".to_string(),
            "z.object({ posts: z.object({ none: z.object({ title: z.string() }) }) })".to_string()
        )],
        "the relation field's own type locates the quantifier target"
    );
}

#[test]
fn test_order_by_on_other_model() {
    assert_eq!(
        section(&["orderBy.posts.title"], "post", "orderBy").as_deref(),
        Some("z.object({ posts: z.object({ title: z.string() }) })")
    );
}

#[test]
fn test_pagination_sections() {
    let allow = AllowList::from_paths(["take", "skip"]);
    assert_eq!(
        sections(&registry(), &synonyms(), &allow, "user"),
        [
            ("take".to_string(), "z.number()".to_string()),
            ("skip".to_string(), "z.number()".to_string()),
        ]
    );
}

#[test]
fn test_optional_scalar_is_nullish() {
    let registry = registry().with_model(
        "user",
        Model::new().with_field("name", Field::new("String").optional()),
    );
    let allow = AllowList::from_paths(["where.name"]);
    assert_eq!(
        sections(&registry, &synonyms(), &allow, "user"),
        [("where".to_string(), "z.object({ name: z.string().nullish() })".to_string())]
    );
}

#[test]
fn test_membership_filters() {
    assert_eq!(
        section(&["where.age.in", "where.age.notIn"], "user", "where").as_deref(),
        Some("z.object({ age: z.object({ in: z.array(z.number().int()), notIn: z.array(z.number().int()) }) })")
    );
}

#[test]
fn test_string_filters() {
    assert_eq!(
        section(
            &["where.email.contains", "where.email.startsWith", "where.email.endsWith"],
            "user",
            "where"
        )
        .as_deref(),
        Some("z.object({ email: z.object({ contains: z.string(), startsWith: z.string(), endsWith: z.string() }) })")
    );
}

#[test]
fn test_full_text_search() {
    assert_eq!(
        section(&["where.posts.content.search"], "post", "where").as_deref(),
        Some("z.object({ posts: z.object({ content: z.object({ search: z.string() }) }) })")
    );
}

#[test]
fn test_enum_literals_narrow_membership() {
    let allow = AllowList::from_paths(["where.status.in[].ACTIVE", "where.status.notIn[].SUSPENDED"]);
    let got = sections(&registry(), &SynonymTable::new(), &allow, "user");
    assert_eq!(
        got[0].1,
        r#"z.object({ status: z.object({ in: z.array(z.enum(["ACTIVE"])), notIn: z.array(z.enum(["SUSPENDED"])) }) })"#
    );
}

// ---------------------------------------------------------------------------
// Omission and fallbacks
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_fields_are_omitted() {
    for paths in [
        &["where.posts.some.unknownField"][..],
        &["where.unknownField.in"][..],
        &["where.unknownField.equals"][..],
    ] {
        let allow = AllowList::from_paths(paths.iter().copied());
        assert!(
            sections(&registry(), &synonyms(), &allow, "user").is_empty(),
            "{paths:?} should contribute nothing"
        );
    }
}

#[test]
fn test_unknown_entries_do_not_disturb_others() {
    assert_eq!(
        section(&["select.nonExistentField", "select.id"], "user", "select").as_deref(),
        Some("z.object({ id: z.string() })")
    );
}

#[test]
fn test_list_relation_with_unknown_target_is_any() {
    let registry = ModelRegistry::new().with_model(
        "user",
        Model::new()
            .with_field("id", Field::new("String").id())
            .with_field("posts", Field::new("post").list()),
    );
    for path in ["select.posts", "select.posts.title", "select.posts[].title"] {
        let allow = AllowList::from_paths([path]);
        assert_eq!(
            sections(&registry, &SynonymTable::new(), &allow, "user"),
            [("select".to_string(), "z.object({ posts: z.any() })".to_string())],
            "{path}"
        );
    }
}

#[test]
fn test_relation_without_deeper_entries_is_empty_object() {
    assert_eq!(
        section(&["where.author"], "post", "where").as_deref(),
        Some("z.object({ author: z.object({}) })")
    );
    assert_eq!(
        section(&["where.profile"], "user", "where").as_deref(),
        Some("z.object({ profile: z.object({}).nullish() })"),
        "an optional relation container stays nullable"
    );
}

// ---------------------------------------------------------------------------
// Relation expansion
// ---------------------------------------------------------------------------

#[test]
fn test_relation_terminal_merges_nested_entries() {
    assert_eq!(
        section(&["select.profile", "select.profile.bio"], "user", "select").as_deref(),
        Some("z.object({ profile: z.object({ bio: z.string().nullish() }).nullish() })")
    );
    assert_eq!(
        section(&["select.profile.bio", "select.profile"], "user", "select").as_deref(),
        Some("z.object({ profile: z.object({ bio: z.string().nullish() }).nullish() })"),
        "entry order must not change the result"
    );
}

#[test]
fn test_list_marker_on_relation() {
    assert_eq!(
        section(&["select.posts[]", "select.posts[].title"], "user", "select").as_deref(),
        Some("z.object({ posts: z.array(z.object({ title: z.string() })) })")
    );
}

#[test]
fn test_relation_write_operations() {
    let got = section(
        &["data.profile", "data.profile.connect", "data.profile.create.bio"],
        "user",
        "data",
    );
    assert_eq!(
        got.as_deref(),
        Some("z.object({ profile: z.object({ connect: z.object({ id: z.string() }), create: z.object({ bio: z.string().nullish() }) }).nullish() })")
    );
}

fn tag_registry() -> ModelRegistry {
    ModelRegistry::new()
        .with_model(
            "users",
            Model::new()
                .with_field("profile", Field::new("profiles"))
                .with_field("email", Field::new("String"))
                .with_field("id", Field::new("String"))
                .with_field("tags", Field::new("tags").optional().list())
                .with_field("age", Field::new("Int").optional()),
        )
        .with_model(
            "tags",
            Model::new()
                .with_field("id", Field::new("String").unique())
                .with_field("color", Field::new("String"))
                .with_field("name", Field::new("String").optional()),
        )
}

const TAG_OPERATION_PATHS: [&str; 17] = [
    "select.tags",
    "select.tags.connect.id",
    "select.tags.connectOrCreate.where.id",
    "select.tags.connectOrCreate.create.name",
    "select.tags.create.data.name",
    "select.tags.createMany.data.name",
    "select.tags.update.where.id",
    "select.tags.update.data.name",
    "select.tags.updateMany.where",
    "select.tags.updateMany.data.name",
    "select.tags.upsert.where.id",
    "select.tags.upsert.create.name",
    "select.tags.upsert.update.name",
    "select.tags.disconnect.id",
    "select.tags.delete.id",
    "select.tags.deleteMany.where",
    "select.tags.set.id",
];

const TAG_OPERATIONS: &str = concat!(
    "z.object({ ",
    "connect: z.object({ id: z.string() }), ",
    "connectOrCreate: z.object({ where: z.object({ id: z.string() }), create: z.object({ name: z.string().nullish() }) }), ",
    "create: z.object({}), ",
    "createMany: z.object({ data: z.array(z.object({ name: z.string().nullish() })), skipDuplicates: z.boolean().nullish() }).nullish(), ",
    "delete: z.object({ delete: z.array(z.object({ id: z.string() })) }).nullish(), ",
    "deleteMany: z.object({ where: z.object({}).nullish() }).nullish(), ",
    "disconnect: z.object({ disconnect: z.array(z.object({ id: z.string() })) }).nullish(), ",
    "set: z.object({ set: z.array(z.object({ id: z.string() })) }).nullish(), ",
    "update: z.object({ update: z.array(z.object({ where: z.object({ id: z.string() }), data: z.object({ name: z.string().nullish() }) })) }).nullish(), ",
    "updateMany: z.object({ where: z.object({}).nullish(), data: z.object({ name: z.string().nullish() }) }).nullish(), ",
    "upsert: z.object({ where: z.object({ id: z.string() }), create: z.object({ name: z.string().nullish() }), update: z.object({ name: z.string().nullish() }) })",
    " }).nullish()"
);

/// The `select` section for `select.id` followed by `tag_paths`.
fn tag_select(tag_paths: &[&str]) -> String {
    let allow = AllowList::from_paths(std::iter::once("select.id").chain(tag_paths.iter().copied()));
    let got = sections(&tag_registry(), &SynonymTable::new(), &allow, "users");
    assert_eq!(got.len(), 1, "only a select section: {got:?}");
    got[0].1.clone()
}

#[test]
fn test_every_relation_operation_with_nested_fields() {
    assert_eq!(
        tag_select(&TAG_OPERATION_PATHS),
        format!("z.object({{ id: z.string(), tags: {TAG_OPERATIONS} }})")
    );
}

#[test]
fn test_relation_operations_independent_of_entry_order() {
    let expected = tag_select(&TAG_OPERATION_PATHS);

    let mut reversed = TAG_OPERATION_PATHS.to_vec();
    reversed.reverse();
    assert_eq!(tag_select(&reversed), expected, "reversed entries");

    let mut container_last = TAG_OPERATION_PATHS[1..].to_vec();
    container_last.push("select.tags");
    assert_eq!(tag_select(&container_last), expected, "container entry last");

    assert_eq!(
        tag_select(&TAG_OPERATION_PATHS[1..]),
        expected,
        "operation entries alone imply the container"
    );
}

#[test]
fn test_single_operation_entry_either_order() {
    for (op_path, shape) in [
        (
            "select.tags.createMany.data.name",
            "createMany: z.object({ data: z.array(z.object({ name: z.string().nullish() })), skipDuplicates: z.boolean().nullish() }).nullish()",
        ),
        (
            "select.tags.update.data.name",
            "update: z.object({ update: z.array(z.object({ where: z.object({ id: z.string() }), data: z.object({ name: z.string().nullish() }) })) }).nullish()",
        ),
        (
            "select.tags.delete.id",
            "delete: z.object({ delete: z.array(z.object({ id: z.string() })) }).nullish()",
        ),
    ] {
        let expected = format!("z.object({{ id: z.string(), tags: z.object({{ {shape} }}).nullish() }})");
        assert_eq!(tag_select(&["select.tags", op_path]), expected, "{op_path} after container");
        assert_eq!(tag_select(&[op_path, "select.tags"]), expected, "{op_path} before container");
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn relation_operations_ignore_shuffled_entries(
            shuffled in Just(TAG_OPERATION_PATHS.to_vec()).prop_shuffle()
        ) {
            let allow = AllowList::from_paths(shuffled.iter().copied());
            let module = generate(&tag_registry(), &SynonymTable::new(), &allow, "users").unwrap();
            let expected = format!(
                "export const usersSchema = z.object({{ select: z.object({{ tags: {TAG_OPERATIONS} }}) }});"
            );
            prop_assert!(module.contains(&expected), "{}", module);
        }
    }
}

#[test]
fn test_write_operations_without_unique_field() {
    let got = section(&["data.posts", "data.posts.connect"], "user", "data");
    assert_eq!(
        got.as_deref(),
        Some("z.object({ posts: z.any() })"),
        "post has no unique scalar field to connect by"
    );
}

#[test]
fn test_cycle_terminates_with_any() {
    let registry = registry();
    let synonyms = synonyms();
    let allow = AllowList::from_paths(["data.profile.create.user.profile.bio", "data.profile"]);
    let got = sections(&registry, &synonyms, &allow, "user");
    assert!(
        got[0].1.contains("create: z.object({ user: z.object({ profile: z.any().nullish() }) })"),
        "revisited model should fall back: {}",
        got[0].1
    );

    let allow = AllowList::from_paths(["x.user.profile.user.name"]);
    let ctx = SchemaContext::new(&registry, &synonyms, &allow);
    assert_eq!(
        expand_model(&ctx, "profile", "x", &Trail::Empty).as_str(),
        "z.object({ user: z.object({ profile: z.any().nullish() }) })"
    );
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn test_custom_type_and_message_overrides() {
    let allow = AllowList::new()
        .with_entry(AllowEntry::Override {
            path: "data.email".into(),
            field: FieldOverride {
                type_override: Some(TypeOverride::Named("email".into())),
                message: Some("must be an email".into()),
            },
        })
        .with_entry(AllowEntry::Override {
            path: "data.name".into(),
            field: FieldOverride {
                type_override: Some(TypeOverride::Named("length(2,40)".into())),
                message: None,
            },
        });
    let got = sections(&registry(), &synonyms(), &allow, "user");
    assert_eq!(
        got[0].1,
        r#"z.object({ email: z.string().email().refine((val) => true, { message: "must be an email" }), name: z.string().min(2).max(40) })"#
    );
}

#[test]
fn test_optional_applied_exactly_once() {
    let allow = AllowList::new().with_entry(AllowEntry::Override {
        path: "data.bio".into(),
        field: FieldOverride {
            type_override: Some(TypeOverride::Named("nonempty?".into())),
            message: None,
        },
    });
    let got = sections(&registry(), &synonyms(), &allow, "profile");
    assert_eq!(got[0].1, "z.object({ bio: z.string().min(1).nullish() })");

    let allow = AllowList::new().with_entry(AllowEntry::Override {
        path: "data.bio".into(),
        field: FieldOverride {
            type_override: None,
            message: Some("bio".into()),
        },
    });
    let got = sections(&registry(), &synonyms(), &allow, "profile");
    assert_eq!(
        got[0].1,
        r#"z.object({ bio: z.string().refine((val) => true, { message: "bio" }).nullish() })"#
    );
}

// ---------------------------------------------------------------------------
// Module output
// ---------------------------------------------------------------------------

#[test]
fn test_generated_module() {
    let allow = AllowList::from_paths(["select.id", "select.name"]);
    let module = generate(&registry(), &synonyms(), &allow, "user").unwrap();
    assert_eq!(
        module,
        "import { z } from 'zod';\n\n\
         export const userSchema = z.object({ select: z.object({ id: z.string(), name: z.string() }) });\n\n\
         export type userType = z.infer<typeof userSchema>;\n"
    );
}

#[test]
fn test_generation_is_deterministic() {
    let allow = AllowList::from_paths([
        "where.AND[].age",
        "where.posts.some.title",
        "select.profile.bio",
        "data.profile",
        "data.profile.connect",
    ]);
    let first = generate(&registry(), &synonyms(), &allow, "user").unwrap();
    let second = generate(&registry(), &synonyms(), &allow, "user").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_target_model_is_an_error() {
    let allow = AllowList::from_paths(["where.id"]);
    let err = generate(&registry(), &synonyms(), &allow, "account").unwrap_err();
    assert!(err.to_string().contains("account"), "{err}");
}
