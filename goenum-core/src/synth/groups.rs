//! Renderers for each method group.

use crate::enums::{schema_literals, schema_type, Capabilities, Capability, EnumDescriptor};

use super::writer::{go_quote, GoWriter};

/// Values shared by all renderers of one descriptor.
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub desc: &'a EnumDescriptor,
    pub caps: Capabilities,
    /// Receiver name
    pub r: &'a str,
    /// Type name
    pub t: &'a str,
    /// Null member, empty when not nullable
    pub null: &'a str,
}

impl<'a> RenderContext<'a> {
    pub fn new(desc: &'a EnumDescriptor) -> Self {
        Self {
            desc,
            caps: Capabilities::of(desc),
            r: &desc.recv,
            t: &desc.type_name,
            null: desc.null_member.as_deref().unwrap_or(""),
        }
    }
}

/// Renders the methods of `group`, each followed by a blank line.
pub fn render(group: Capability, ctx: &RenderContext, w: &mut GoWriter) {
    match group {
        Capability::Validation => validation(ctx, w),
        Capability::Listing => listing(ctx, w),
        Capability::Stringer => stringer(ctx, w),
        Capability::NullSentinel => null_sentinel(ctx, w),
        Capability::Persistence if ctx.caps.is_string => persistence_string(ctx, w),
        Capability::Persistence => persistence_integer(ctx, w),
        Capability::Schema => schema(ctx, w),
    }
}

fn validation(ctx: &RenderContext, w: &mut GoWriter) {
    let RenderContext { r, t, desc, .. } = ctx;
    let last = desc.members.len().saturating_sub(1);

    w.doc(format!("Valid indicates if {r} is any of the valid values for {t}"));
    w.open(format!("func ({r} {t}) Valid() bool {{"));
    w.line(format!("switch {r} {{"));
    w.line("case");
    w.indent();
    for (i, member) in desc.members.iter().enumerate() {
        let sep = if i == last { ':' } else { ',' };
        w.line(format!("{member}{sep}"));
    }
    w.line("return true");
    w.dedent();
    w.line("}");
    w.line("return false");
    w.close("}");
    w.line("");

    w.doc(format!("Validate returns an error if {r} is none of the valid values for {t}"));
    w.open(format!("func ({r} {t}) Validate() error {{"));
    w.open(format!("if !{r}.Valid() {{"));
    w.line(format!(
        "return fmt.Errorf(\"invalid value %#v for type {}\", {r})",
        desc.qualified_name()
    ));
    w.close("}");
    w.line("return nil");
    w.close("}");
    w.line("");
}

fn listing(ctx: &RenderContext, w: &mut GoWriter) {
    let RenderContext { t, desc, caps, .. } = ctx;

    w.doc(format!("Enums returns all valid values for {t}"));
    w.open(format!("func ({t}) Enums() []{t} {{"));
    w.open(format!("return []{t}{{"));
    for member in &desc.members {
        w.line(format!("{member},"));
    }
    w.close("}");
    w.close("}");
    w.line("");

    w.doc(format!("EnumStrings returns all valid values for {t} as strings"));
    w.open(format!("func ({t}) EnumStrings() []string {{"));
    w.open("return []string{");
    for literal in &desc.literals {
        if caps.is_string {
            w.line(format!("{literal},"));
        } else {
            w.line(format!("{},", go_quote(literal)));
        }
    }
    w.close("}");
    w.close("}");
    w.line("");
}

fn stringer(ctx: &RenderContext, w: &mut GoWriter) {
    let RenderContext { r, t, .. } = ctx;

    w.doc(format!("String implements the fmt.Stringer interface for {t}"));
    w.open(format!("func ({r} {t}) String() string {{"));
    w.line(format!("return string({r})"));
    w.close("}");
    w.line("");
}

fn null_sentinel(ctx: &RenderContext, w: &mut GoWriter) {
    let RenderContext { r, t, null, desc, .. } = ctx;
    let u = &desc.underlying;

    w.doc(format!("IsNull returns true if {r} is the null value {null}"));
    w.open(format!("func ({r} {t}) IsNull() bool {{"));
    w.line(format!("return {r} == {null}"));
    w.close("}");
    w.line("");

    w.doc(format!("IsNotNull returns true if {r} is not the null value {null}"));
    w.open(format!("func ({r} {t}) IsNotNull() bool {{"));
    w.line(format!("return {r} != {null}"));
    w.close("}");
    w.line("");

    w.doc(format!("SetNull sets the null value {null} at {r}"));
    w.open(format!("func ({r} *{t}) SetNull() {{"));
    w.line(format!("*{r} = {null}"));
    w.close("}");
    w.line("");

    w.doc(format!(
        "MarshalJSON implements encoding/json.Marshaler for {t}\nby returning the JSON null value for {null}."
    ));
    w.open(format!("func ({r} {t}) MarshalJSON() ([]byte, error) {{"));
    w.open(format!("if {r} == {null} {{"));
    w.line("return []byte(\"null\"), nil");
    w.close("}");
    w.line(format!("return json.Marshal({u}({r}))"));
    w.close("}");
    w.line("");

    w.doc("UnmarshalJSON implements encoding/json.Unmarshaler");
    w.open(format!("func ({r} *{t}) UnmarshalJSON(j []byte) error {{"));
    w.open("if bytes.Equal(j, []byte(\"null\")) {");
    w.line(format!("*{r} = {null}"));
    w.line("return nil");
    w.close("}");
    w.line(format!("return json.Unmarshal(j, (*{u})({r}))"));
    w.close("}");
    w.line("");
}

/// Shared `Scan` skeleton: one `case` per accepted source kind.
fn scan(ctx: &RenderContext, w: &mut GoWriter, source_kinds: &[&str]) {
    let RenderContext { r, t, null, desc, .. } = ctx;

    w.doc(format!("Scan implements the database/sql.Scanner interface for {t}"));
    w.open(format!("func ({r} *{t}) Scan(value any) error {{"));
    w.line("switch value := value.(type) {");
    for kind in source_kinds {
        w.line(format!("case {kind}:"));
        w.indent().line(format!("*{r} = {t}(value)")).dedent();
    }
    w.line("case nil:");
    w.indent().line(format!("*{r} = {null}")).dedent();
    w.line("default:");
    w.indent()
        .line(format!(
            "return fmt.Errorf(\"can't scan SQL value of type %T as {}\", value)",
            desc.qualified_name()
        ))
        .dedent();
    w.line("}");
    w.line("return nil");
    w.close("}");
    w.line("");
}

fn value(ctx: &RenderContext, w: &mut GoWriter, conversion: &str) {
    let RenderContext { r, t, null, .. } = ctx;

    w.doc(format!(
        "Value implements the driver database/sql/driver.Valuer interface for {t}"
    ));
    w.open(format!("func ({r} {t}) Value() (driver.Value, error) {{"));
    w.open(format!("if {r} == {null} {{"));
    w.line("return nil, nil");
    w.close("}");
    w.line(format!("return {conversion}({r}), nil"));
    w.close("}");
    w.line("");
}

fn persistence_string(ctx: &RenderContext, w: &mut GoWriter) {
    scan(ctx, w, &["string", "[]byte"]);
    value(ctx, w, &ctx.desc.underlying);
}

fn persistence_integer(ctx: &RenderContext, w: &mut GoWriter) {
    scan(ctx, w, &["int64", "float64"]);
    value(ctx, w, "int64");
}

fn schema(ctx: &RenderContext, w: &mut GoWriter) {
    let RenderContext { t, null, desc, caps, .. } = ctx;
    let tag = schema_type(desc.representation);
    let literals = schema_literals(desc);

    w.doc(format!("JSONSchema implements the jsonschema.Schema interface for {t}"));
    w.open(format!("func ({t}) JSONSchema() jsonschema.Schema {{"));
    w.open("return jsonschema.Schema{");
    if caps.is_nullable {
        w.open("OneOf: []*jsonschema.Schema{");
        w.open("{");
        schema_enum(w, tag, &literals);
        w.close("},");
        w.line("{Type: \"null\"},");
        w.close("},");
        w.line(format!("Default: {null},"));
    } else {
        schema_enum(w, tag, &literals);
    }
    w.close("}");
    w.close("}");
    w.line("");
}

fn schema_enum(w: &mut GoWriter, tag: &str, literals: &[String]) {
    w.line(format!("Type: \"{tag}\","));
    w.open("Enum: []any{");
    for literal in literals {
        w.line(format!("{literal},"));
    }
    w.close("},");
}
