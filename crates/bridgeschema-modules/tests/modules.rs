//! End-to-end tests: TypeScript module spec in, schema out.

use bridgeschema_modules::{
    ModuleParse, ParserError, ParserErrorKind, Platform, TypeAnnotation, build_module_schema,
    read_typescript,
};
use serde_json::json;

fn parse(module_name: &str, source: &str) -> Result<ModuleParse, ParserError> {
    let program = read_typescript(source).expect("parse failed");
    build_module_schema(module_name, &program)
}

/// A complete spec file registering `registered` with the given interface body.
fn spec_file(registered: &str, prelude: &str, members: &str) -> String {
    format!(
        "import type {{TurboModule}} from 'react-native';\n\
         import {{TurboModuleRegistry}} from 'react-native';\n\
         {prelude}\n\
         export interface Spec extends TurboModule {{\n{members}\n}}\n\
         export default TurboModuleRegistry.getEnforcing<Spec>('{registered}');\n"
    )
}

fn parse_members(members: &str) -> ModuleParse {
    parse("NativeFoo", &spec_file("Foo", "", members)).expect("module failed")
}

fn parse_members_with(prelude: &str, members: &str) -> ModuleParse {
    parse("NativeFoo", &spec_file("Foo", prelude, members)).expect("module failed")
}

fn parse_cxx_members(prelude: &str, members: &str) -> ModuleParse {
    parse("NativeFooCxx", &spec_file("FooCxx", prelude, members)).expect("module failed")
}

fn fault_codes(parse: &ModuleParse) -> Vec<&'static str> {
    parse.errors.iter().map(|e| e.kind.code()).collect()
}

fn fatal(module_name: &str, source: &str) -> ParserErrorKind {
    parse(module_name, source).expect_err("expected fatal fault").kind
}

fn return_type(parse: &ModuleParse, method: &str) -> serde_json::Value {
    let property = parse.schema.property(method).expect("missing property");
    serde_json::to_value(&property.type_annotation.value.return_type_annotation).unwrap()
}

fn param_types(parse: &ModuleParse, method: &str) -> serde_json::Value {
    let property = parse.schema.property(method).expect("missing property");
    let params: Vec<_> = property
        .type_annotation
        .value
        .params
        .iter()
        .map(|p| &p.type_annotation)
        .collect();
    serde_json::to_value(params).unwrap()
}

// ============================================================================
// Whole schemas
// ============================================================================

#[test]
fn constants_object() {
    let parse = parse_members("  getConstants(): {foo: number};");
    assert!(parse.errors.is_empty());
    insta::assert_json_snapshot!(parse.schema, @r#"
    {
      "type": "NativeModule",
      "aliases": {},
      "properties": [
        {
          "name": "getConstants",
          "optional": false,
          "typeAnnotation": {
            "type": "FunctionTypeAnnotation",
            "params": [],
            "returnTypeAnnotation": {
              "type": "ObjectTypeAnnotation",
              "properties": [
                {
                  "name": "foo",
                  "optional": false,
                  "typeAnnotation": {
                    "type": "NumberTypeAnnotation"
                  }
                }
              ]
            }
          }
        }
      ],
      "moduleNames": [
        "Foo"
      ]
    }
    "#);
}

#[test]
fn named_objects_become_aliases() {
    let source = spec_file(
        "Geo",
        "type Point = {\n  x: number;\n  label?: string | null;\n};",
        "  move(to: Point): void;\n  current(): Point | null;",
    );
    let parse = parse("NativeGeo", &source).unwrap();
    assert!(parse.errors.is_empty());
    insta::assert_json_snapshot!(parse.schema.aliases, @r#"
    {
      "Point": {
        "type": "ObjectTypeAnnotation",
        "properties": [
          {
            "name": "x",
            "optional": false,
            "typeAnnotation": {
              "type": "NumberTypeAnnotation"
            }
          },
          {
            "name": "label",
            "optional": true,
            "typeAnnotation": {
              "type": "NullableTypeAnnotation",
              "typeAnnotation": {
                "type": "StringTypeAnnotation"
              }
            }
          }
        ]
      }
    }
    "#);
    assert_eq!(
        param_types(&parse, "move"),
        json!([{"type": "TypeAliasTypeAnnotation", "name": "Point"}])
    );
    assert_eq!(
        return_type(&parse, "current"),
        json!({
            "type": "NullableTypeAnnotation",
            "typeAnnotation": {"type": "TypeAliasTypeAnnotation", "name": "Point"}
        })
    );
}

#[test]
fn interfaces_are_translated_as_objects() {
    let parse = parse("NativeFoo", &spec_file(
        "Foo",
        "interface Options {\n  retries: Int32;\n}",
        "  configure(options: Options): void;",
    ))
    .unwrap();
    assert_eq!(
        serde_json::to_value(&parse.schema.aliases["Options"]).unwrap(),
        json!({
            "type": "ObjectTypeAnnotation",
            "properties": [
                {"name": "retries", "optional": false, "typeAnnotation": {"type": "Int32TypeAnnotation"}}
            ]
        })
    );
}

#[test]
fn interfaces_include_inherited_members() {
    let parse = parse("NativeFoo", &spec_file(
        "Foo",
        "interface Base {\n  a: number;\n  b: number;\n}\n\
         interface Derived extends Base {\n  b: string;\n  c: boolean;\n}",
        "  f(x: Derived): void;",
    ))
    .unwrap();
    assert!(parse.errors.is_empty());
    assert_eq!(
        serde_json::to_value(&parse.schema.aliases["Derived"]).unwrap(),
        json!({
            "type": "ObjectTypeAnnotation",
            "properties": [
                {"name": "a", "optional": false, "typeAnnotation": {"type": "NumberTypeAnnotation"}},
                {"name": "b", "optional": false, "typeAnnotation": {"type": "StringTypeAnnotation"}},
                {"name": "c", "optional": false, "typeAnnotation": {"type": "BooleanTypeAnnotation"}}
            ]
        })
    );
}

#[test]
fn interfaces_with_unknown_or_circular_bases_are_rejected() {
    let parse = parse("NativeFoo", &spec_file(
        "Foo",
        "interface Remote extends Elsewhere {\n  a: number;\n}\n\
         interface Ping extends Pong {}\n\
         interface Pong extends Ping {}",
        "  f(x: Remote): void;\n  g(x: Ping): void;\n  h(): void;",
    ))
    .unwrap();
    assert_eq!(fault_codes(&parse), ["UnsupportedGeneric", "UnsupportedGeneric"]);
    assert!(parse.schema.aliases.is_empty());
    assert_eq!(param_types(&parse, "f"), json!([]));
    assert_eq!(param_types(&parse, "g"), json!([]));
    assert!(parse.schema.property("h").is_some());
}

// ============================================================================
// Module discovery
// ============================================================================

#[test]
fn missing_module_interface() {
    let source = "export interface Other {}\n\
                  export default TurboModuleRegistry.get<Spec>('Foo');\n";
    assert_eq!(fatal("NativeFoo", source), ParserErrorKind::ModuleInterfaceNotFound);
}

#[test]
fn two_module_interfaces() {
    let source = spec_file("Foo", "interface Spec2 extends TurboModule {}", "");
    assert_eq!(
        fatal("NativeFoo", &source),
        ParserErrorKind::MoreThanOneModuleInterface {
            names: vec!["Spec2".into(), "Spec".into()]
        }
    );
}

#[test]
fn misnamed_module_interface() {
    let source = "interface FooSpec extends TurboModule {}\n\
                  export default TurboModuleRegistry.get<FooSpec>('Foo');\n";
    assert_eq!(
        fatal("NativeFoo", source),
        ParserErrorKind::MisnamedModuleInterface {
            name: "FooSpec".into()
        }
    );
}

#[test]
fn interfaces_extending_more_than_the_marker_do_not_qualify() {
    let source = "interface Spec extends TurboModule, Other {}\n\
                  export default TurboModuleRegistry.get<Spec>('Foo');\n";
    assert_eq!(fatal("NativeFoo", source), ParserErrorKind::ModuleInterfaceNotFound);
}

#[test]
fn registration_call_names_the_module() {
    let parse = parse_members("");
    assert_eq!(parse.schema.module_names, ["Foo"]);
    assert_eq!(parse.schema.excluded_platforms, None);
}

#[test]
fn registration_call_may_sit_in_a_variable() {
    let source = "export interface Spec extends TurboModule {}\n\
                  const NativeFoo = TurboModuleRegistry.get<Spec>('Foo') as Spec | null;\n\
                  export default NativeFoo;\n";
    assert_eq!(parse("NativeFoo", source).unwrap().schema.module_names, ["Foo"]);
}

#[test]
fn unused_module_interface() {
    let source = "export interface Spec extends TurboModule {}\n";
    assert_eq!(fatal("NativeFoo", source), ParserErrorKind::UnusedModuleInterface);
}

#[test]
fn more_than_one_registration_call() {
    let source = "export interface Spec extends TurboModule {}\n\
                  TurboModuleRegistry.get<Spec>('Foo');\n\
                  export default TurboModuleRegistry.getEnforcing<Spec>('Foo');\n";
    assert_eq!(
        fatal("NativeFoo", source),
        ParserErrorKind::MoreThanOneModuleRegistryCalls { count: 2 }
    );
}

#[test]
fn registration_call_shape_is_checked() {
    let case = |call: &str| {
        fatal(
            "NativeFoo",
            &format!("export interface Spec extends TurboModule {{}}\nexport default {call};\n"),
        )
    };

    assert_eq!(
        case("TurboModuleRegistry.get('Foo')"),
        ParserErrorKind::UntypedModuleRegistryCall {
            method: "get".into(),
            module_name: "Foo".into()
        }
    );
    assert_eq!(
        case("TurboModuleRegistry.get<Other>('Foo')"),
        ParserErrorKind::IncorrectModuleRegistryCallTypeParameter {
            method: "get".into(),
            module_name: "Foo".into()
        }
    );
    assert_eq!(
        case("TurboModuleRegistry.getEnforcing<Spec>('Foo', 'Bar')"),
        ParserErrorKind::IncorrectModuleRegistryCallArity {
            method: "getEnforcing".into(),
            arity: 2
        }
    );
    assert_eq!(
        case("TurboModuleRegistry.get<Spec>(name)"),
        ParserErrorKind::IncorrectModuleRegistryCallArgumentType {
            method: "get".into(),
            found: "identifier".into()
        }
    );
}

#[test]
fn computed_registry_access_is_not_a_registration() {
    let source = "export interface Spec extends TurboModule {}\n\
                  export default TurboModuleRegistry['get']<Spec>('Foo');\n";
    assert_eq!(fatal("NativeFoo", source), ParserErrorKind::UnusedModuleInterface);
}

// ============================================================================
// Platforms
// ============================================================================

#[test]
fn platform_suffixes() {
    let excluded = |registered: &str| {
        parse("NativeFoo", &spec_file(registered, "", ""))
            .unwrap()
            .schema
            .excluded_platforms
    };
    assert_eq!(excluded("FooAndroid"), Some(vec![Platform::Ios]));
    assert_eq!(excluded("FooIOS"), Some(vec![Platform::Android]));
    assert_eq!(excluded("FooCxx"), Some(vec![Platform::Ios, Platform::Android]));
}

#[test]
fn file_name_suffix_counts_too() {
    let parse = parse("NativeFooAndroid", &spec_file("Foo", "", "")).unwrap();
    assert_eq!(parse.schema.excluded_platforms, Some(vec![Platform::Ios]));
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn array_of_functions_keeps_property() {
    let parse = parse_members("  run(callbacks: Array<() => void>): void;");
    assert_eq!(fault_codes(&parse), ["UnsupportedArrayElementTypeAnnotation"]);
    assert_eq!(
        param_types(&parse, "run"),
        json!([{"type": "ArrayTypeAnnotation"}])
    );
}

#[test]
fn arrays_of_supported_elements() {
    let parse = parse_members(
        "  a(x: string[]): void;\n  b(x: ReadonlyArray<number>): void;\n  c(x: readonly boolean[]): void;",
    );
    assert!(parse.errors.is_empty());
    for (method, element) in [
        ("a", "StringTypeAnnotation"),
        ("b", "NumberTypeAnnotation"),
        ("c", "BooleanTypeAnnotation"),
    ] {
        assert_eq!(
            param_types(&parse, method),
            json!([{"type": "ArrayTypeAnnotation", "elementType": {"type": element}}])
        );
    }
}

#[test]
fn unnamed_param_is_dropped() {
    let parse = parse_members("  log(level, message: string): void;");
    assert_eq!(fault_codes(&parse), ["UnnamedFunctionParam"]);
    let property = parse.schema.property("log").unwrap();
    let names: Vec<_> = property
        .type_annotation
        .value
        .params
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["message"]);
}

#[test]
fn faulty_members_are_dropped_and_siblings_kept() {
    let parse = parse_members(
        "  first(): string;\n  broken(x: Map<string, number>): void;\n  last(): void;",
    );
    assert_eq!(fault_codes(&parse), ["UnsupportedGeneric"]);
    let names: Vec<_> = parse.schema.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["first", "broken", "last"]);
    assert_eq!(param_types(&parse, "broken"), json!([]));
}

#[test]
fn faulty_return_type_drops_member() {
    let parse = parse_members("  a(): Map<string, number>;\n  b(): void;");
    assert_eq!(fault_codes(&parse), ["UnsupportedGeneric"]);
    assert!(parse.schema.property("a").is_none());
    assert!(parse.schema.property("b").is_some());
}

#[test]
fn function_valued_properties() {
    let parse = parse_members(
        "  readonly getName: () => string;\n  maybe?: (() => void) | null;\n  version: number;",
    );
    assert_eq!(fault_codes(&parse), ["UnsupportedModuleProperty"]);
    let maybe = parse.schema.property("maybe").unwrap();
    assert!(maybe.optional);
    assert!(maybe.type_annotation.nullable);
    assert!(parse.schema.property("getName").is_some());
    assert!(parse.schema.property("version").is_none());
}

#[test]
fn marker_types() {
    let parse = parse_members(
        "  f(tag: RootTag, s: Stringish, i: Int32, d: Double, x: Float, o: Object, u: UnsafeObject): Promise<void>;",
    );
    assert!(parse.errors.is_empty());
    assert_eq!(
        param_types(&parse, "f"),
        json!([
            {"type": "RootTagTypeAnnotation"},
            {"type": "StringishTypeAnnotation"},
            {"type": "Int32TypeAnnotation"},
            {"type": "DoubleTypeAnnotation"},
            {"type": "FloatTypeAnnotation"},
            {"type": "GenericObjectTypeAnnotation"},
            {"type": "GenericObjectTypeAnnotation"}
        ])
    );
    assert_eq!(return_type(&parse, "f"), json!({"type": "PromiseTypeAnnotation"}));
}

#[test]
fn promise_needs_one_type_argument() {
    let parse = parse_members("  f(): Promise<string, number>;");
    assert_eq!(
        parse.errors[0].kind,
        ParserErrorKind::IncorrectlyParameterizedGeneric {
            name: "Promise".into(),
            count: 2
        }
    );
}

#[test]
fn void_and_promise_params_are_rejected() {
    let parse = parse_members("  f(a: void, b: Promise<string>, c: boolean): void;");
    assert_eq!(
        fault_codes(&parse),
        [
            "UnsupportedFunctionParamTypeAnnotation",
            "UnsupportedFunctionParamTypeAnnotation"
        ]
    );
    assert_eq!(param_types(&parse, "f"), json!([{"type": "BooleanTypeAnnotation"}]));
}

#[test]
fn object_members_are_checked() {
    let parse = parse_members("  f(o: {ok: string; cb: () => void; run(): void}): void;");
    assert_eq!(
        fault_codes(&parse),
        [
            "UnsupportedObjectPropertyValueTypeAnnotation",
            "UnsupportedObjectPropertyTypeAnnotation"
        ]
    );
    assert_eq!(
        param_types(&parse, "f"),
        json!([{
            "type": "ObjectTypeAnnotation",
            "properties": [
                {"name": "ok", "optional": false, "typeAnnotation": {"type": "StringTypeAnnotation"}}
            ]
        }])
    );
}

#[test]
fn functions_cannot_return_functions_outside_cxx() {
    let parse = parse_members("  f(): () => void;");
    assert_eq!(fault_codes(&parse), ["UnsupportedFunctionReturnTypeAnnotation"]);
    assert!(parse.schema.properties.is_empty());
}

#[test]
fn faults_carry_source_positions() {
    let parse = parse_members("  ok(): void;\n  bad(): symbol;");
    let fault = &parse.errors[0];
    assert_eq!(fault.module_name, "NativeFoo");
    // Two import lines, the empty prelude and the interface header come first.
    assert_eq!(fault.span.line, 6);
    assert_eq!(fault.diagnostic().kind, "UnsupportedTypeAnnotation");
}

#[test]
fn first_alias_registration_wins_across_members() {
    let source = spec_file(
        "Foo",
        "type A = {x: number};",
        "  one(a: A): void;\n  two(): A;",
    );
    let parse = parse("NativeFoo", &source).unwrap();
    assert_eq!(parse.schema.aliases.len(), 1);
    assert_eq!(parse.schema.properties.len(), 2);
}

#[test]
fn circular_aliases_drop_the_parameter() {
    let parse = parse_members_with(
        "type A = B;\ntype B = A;\ntype Loop = Loop | null;\ntype Wrapped = (Wrapped);",
        "  f(x: A): void;\n  g(x: Loop): void;\n  h(x: Wrapped): void;\n  ok(x: number): void;",
    );
    assert_eq!(
        fault_codes(&parse),
        ["UnsupportedGeneric", "UnsupportedGeneric", "UnsupportedGeneric"]
    );
    for method in ["f", "g", "h"] {
        assert_eq!(param_types(&parse, method), json!([]));
    }
    assert_eq!(param_types(&parse, "ok"), json!([{"type": "NumberTypeAnnotation"}]));
}

#[test]
fn aliases_containing_themselves_terminate() {
    let parse = parse_members_with(
        "type List = Array<List>;\ntype Callback = (next: Callback) => void;",
        "  list(items: List): void;\n  listen(callback: Callback): void;",
    );
    // The array element fault is swallowed; the callback parameter is not.
    assert_eq!(fault_codes(&parse), ["UnsupportedGeneric"]);
    assert_eq!(param_types(&parse, "list"), json!([{"type": "ArrayTypeAnnotation"}]));
    assert_eq!(
        param_types(&parse, "listen"),
        json!([{
            "type": "FunctionTypeAnnotation",
            "params": [],
            "returnTypeAnnotation": {"type": "VoidTypeAnnotation"}
        }])
    );
}

#[test]
fn nullable_aliases_do_not_nest() {
    let parse = parse_members_with(
        "type MaybeName = string | null;",
        "  rename(name: MaybeName | undefined): void;",
    );
    assert!(parse.errors.is_empty());
    assert_eq!(
        param_types(&parse, "rename"),
        json!([{
            "type": "NullableTypeAnnotation",
            "typeAnnotation": {"type": "StringTypeAnnotation"}
        }])
    );
}

#[test]
fn index_signatures_on_the_module_are_ignored() {
    let parse = parse_members("  [key: string]: number;\n  ping(): void;");
    assert!(parse.errors.is_empty());
    let names: Vec<_> = parse.schema.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["ping"]);
}

// ============================================================================
// Native-only modules
// ============================================================================

#[test]
fn cxx_literal_unions() {
    let parse = parse_cxx_members(
        "",
        "  n(x: 1 | 2): void;\n  s(x: 'a' | 'b'): void;\n  o(x: {a: number} | {b: string}): void;\n  bad(x: 1 | 'a'): void;",
    );
    assert_eq!(fault_codes(&parse), ["UnsupportedUnionTypeAnnotation"]);
    for (method, member_type) in [
        ("n", "NumberTypeAnnotation"),
        ("s", "StringTypeAnnotation"),
        ("o", "ObjectTypeAnnotation"),
    ] {
        assert_eq!(
            param_types(&parse, method),
            json!([{"type": "UnionTypeAnnotation", "memberType": member_type}])
        );
    }
    assert_eq!(param_types(&parse, "bad"), json!([]));
}

#[test]
fn unions_need_cxx_modules() {
    let parse = parse_members("  n(x: 1 | 2): void;\n  s(x: string | number): void;");
    assert_eq!(
        fault_codes(&parse),
        ["UnsupportedUnionTypeAnnotation", "UnsupportedUnionTypeAnnotation"]
    );
}

#[test]
fn nullable_cxx_union() {
    let parse = parse_cxx_members("", "  n(x: 1 | 2 | null): void;");
    assert_eq!(
        param_types(&parse, "n"),
        json!([{
            "type": "NullableTypeAnnotation",
            "typeAnnotation": {"type": "UnionTypeAnnotation", "memberType": "NumberTypeAnnotation"}
        }])
    );
}

#[test]
fn cxx_enums_and_mixed() {
    let parse = parse_cxx_members(
        "enum Quality { Low = 'low', High = 'high' }\nenum Level { A, B }\nenum Bad { A = 1 + 1 }",
        "  q(x: Quality): Level;\n  m(x: unknown): void;\n  b(x: Bad): void;",
    );
    assert_eq!(fault_codes(&parse), ["UnsupportedEnumDeclaration"]);
    assert_eq!(
        param_types(&parse, "q"),
        json!([{"type": "EnumDeclaration", "memberType": "StringTypeAnnotation"}])
    );
    assert_eq!(
        return_type(&parse, "q"),
        json!({"type": "EnumDeclaration", "memberType": "NumberTypeAnnotation"})
    );
    assert_eq!(param_types(&parse, "m"), json!([{"type": "MixedTypeAnnotation"}]));
}

#[test]
fn cxx_functions_may_return_functions() {
    let parse = parse_cxx_members("", "  f(): () => void;");
    assert!(parse.errors.is_empty());
    let property = parse.schema.property("f").unwrap();
    assert!(matches!(
        property.type_annotation.value.return_type_annotation.value,
        TypeAnnotation::Function(_)
    ));
}

#[test]
fn enums_outside_cxx_are_unsupported() {
    let parse = parse(
        "NativeFoo",
        &spec_file("Foo", "enum Level { A, B }", "  f(x: Level): void;"),
    )
    .unwrap();
    assert_eq!(
        parse.errors[0].kind,
        ParserErrorKind::UnsupportedGeneric {
            name: "Level".into()
        }
    );
}
