// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end emission tests.

use crate::{TransformOptions, transform};

fn emit(source: &str) -> String {
    transform(source, &TransformOptions::default()).expect("transform")
}

#[test]
fn output_is_a_host_closure() {
    let js = emit("int x = 1;");
    assert!(js.starts_with("// this code was autogenerated from PDE\n(function($p) {"));
    assert!(js.ends_with("})"));
}

#[test]
fn statement_scope_declaration() {
    let js = emit("int x = 5;");
    assert!(js.contains("var x = 5"), "got: {js}");
}

#[test]
fn class_scope_declaration() {
    let js = emit("class A { int x = 5; }");
    assert!(js.contains("$this_1.x = 5"), "got: {js}");
}

#[test]
fn constructor_overloads_dispatch_on_arity() {
    let js = emit("class A { A(){} A(int x){} }");
    assert!(js.contains("function $constr_0()"), "got: {js}");
    assert!(js.contains("function $constr_1(x)"), "got: {js}");
    assert!(js.contains("arguments.length === 0"), "got: {js}");
    assert!(js.contains("arguments.length === 1"), "got: {js}");
    assert!(js.contains("$constr.apply(null, arguments);"), "got: {js}");
}

#[test]
fn super_call_and_base_metadata() {
    let js = emit("class A { } class B extends A { B(){ super(); } }");
    assert!(js.contains("$superCstr()"), "got: {js}");
    assert!(js.contains("B.$base = A;"), "got: {js}");
    assert!(js.contains("$p.extendStaticMembers(B, A);"), "got: {js}");
}

#[test]
fn color_literal() {
    let js = emit("color c = #FF8040;");
    assert!(js.contains("0xFFFF8040"), "got: {js}");
}

#[test]
fn int_cast_helper() {
    let js = emit("float y = (int)(x+1);");
    assert!(js.contains("__int_cast((x+1))"), "got: {js}");
}

#[test]
fn for_each_uses_object_iterator() {
    let js = emit("for (int i : list) println(i);");
    assert!(js.contains("new $p.ObjectIterator(list)"), "got: {js}");
    assert!(js.contains(".hasNext()"), "got: {js}");
    assert!(js.contains("i = void(0)"), "got: {js}");
}

#[test]
fn prototype_method_rename() {
    let js = emit("String t = s.replace(\"a\",\"b\");");
    assert!(js.contains("__replace(s,\"a\",\"b\")"), "got: {js}");
}

#[test]
fn classes_emit_base_first() {
    let js = emit("class C extends B { } class B extends A { } class A { }");
    let a = js.find("var A =").expect("A emitted");
    let b = js.find("var B =").expect("B emitted");
    let c = js.find("var C =").expect("C emitted");
    assert!(a < b && b < c, "emission order wrong: {js}");
}

#[test]
fn classes_are_republished_on_the_host() {
    let js = emit("class Ball { }");
    assert!(js.contains("var Ball = (function() {"), "got: {js}");
    assert!(js.contains("$p.Ball = Ball;"), "got: {js}");
}

#[test]
fn global_methods_publish_to_host() {
    let js = emit("void setup() { size(200, 200); }");
    assert!(js.contains("function setup()"), "got: {js}");
    assert!(js.contains("$p.setup = setup;"), "got: {js}");
    assert!(js.contains("$p.size(200, 200)"), "got: {js}");
}

#[test]
fn method_overloads_get_distinct_ids() {
    let js = emit("class A { void go(){} void go(int n){} void go(int a, int b){} }");
    assert!(js.contains("function go$0()"), "got: {js}");
    assert!(js.contains("function go$1_2(n)"), "got: {js}");
    assert!(js.contains("function go$2_3(a, b)"), "got: {js}");
    assert!(js.contains("$p.addMethod($this_1, 'go', go$0, false);"), "got: {js}");
}

#[test]
fn static_members_live_on_the_class() {
    let js = emit("class A { static int count = 0; static void reset(){ count = 0; } }");
    assert!(js.contains("A.count = 0;"), "got: {js}");
    assert!(js.contains("$p.defineProperty($this_1, 'count'"), "got: {js}");
    assert!(js.contains("$p.addMethod(A, 'reset', reset$0, false);"), "got: {js}");
    // The static method body resolves the field against the class.
    assert!(js.contains("A.count = 0"), "got: {js}");
}

#[test]
fn instance_members_resolve_through_self() {
    let js = emit("class A { int x; void bump() { x = x + 1; grow(); } void grow() { } }");
    assert!(js.contains("$this_1.x = $this_1.x + 1"), "got: {js}");
    assert!(js.contains("$this_1.$self.grow()"), "got: {js}");
}

#[test]
fn this_member_versus_method_call() {
    let js = emit("class A { int x; void m() { this.x = 1; this.m(); } }");
    assert!(js.contains("$this_1.x = 1"), "got: {js}");
    assert!(js.contains("$this_1.$self.m()"), "got: {js}");
}

#[test]
fn locals_shadow_fields() {
    let js = emit("class A { int x; void m(int x) { x = 2; } }");
    assert!(js.contains("function m$1(x) {"), "got: {js}");
    assert!(js.contains("x = 2"), "got: {js}");
    assert!(!js.contains("$this_1.x = 2"), "got: {js}");
}

#[test]
fn inner_class_attaches_to_instances() {
    let js = emit("class Outer { class Inner { } }");
    assert!(js.contains("$this_1.Inner = (function() {"), "got: {js}");
    assert!(js.contains("var $this_2 = this;"), "got: {js}");
}

#[test]
fn static_inner_class_attaches_to_both() {
    let js = emit("class Outer { static class Helper { } }");
    assert!(js.contains("Outer.Helper = (function() {"), "got: {js}");
    assert!(js.contains("$this_1.Helper = Outer.Helper;"), "got: {js}");
}

#[test]
fn interface_emits_stub_and_metadata() {
    let js = emit("interface Drawable { void draw(); void hide(); } \
                   class Dot implements Drawable { void draw(){} void hide(){} }");
    assert!(
        js.contains("throw 'Unable to create an instance of the interface'"),
        "got: {js}"
    );
    assert!(js.contains("Drawable.$methods = ['draw', 'hide'];"), "got: {js}");
    assert!(js.contains("Drawable.$isInterface = true;"), "got: {js}");
    assert!(js.contains("$p.extendInterfaceMembers(Dot, Drawable);"), "got: {js}");
    assert!(js.contains("Dot.$interfaces = [Drawable];"), "got: {js}");
    // The interface must emit before its implementor.
    let interface_at = js.find("var Drawable =").expect("interface emitted");
    let class_at = js.find("var Dot =").expect("class emitted");
    assert!(interface_at < class_at);
}

#[test]
fn varargs_method_binds_rest_arguments() {
    let js = emit("class A { void log(int first, String... rest) { } }");
    assert!(
        js.contains("var rest = Array.prototype.slice.call(arguments, 1);"),
        "got: {js}"
    );
    assert!(js.contains("$p.addMethod($this_1, 'log', log$1, true);"), "got: {js}");
}

#[test]
fn varargs_constructor_dispatches_gte() {
    let js = emit("class A { A(int x, int... more) { } }");
    assert!(js.contains("arguments.length >= 1"), "got: {js}");
}

#[test]
fn unknown_base_emits_textually_and_skips_static_extension() {
    let js = emit("class Spot extends PVector { }");
    assert!(js.contains("Spot.$base = $p.PVector;"), "got: {js}");
    assert!(!js.contains("extendStaticMembers"), "got: {js}");
}

#[test]
fn anonymous_class_instantiates_inline() {
    let js = emit("Runnable r = new Runnable() { void run() { } };");
    assert!(js.contains("new ((function() {"), "got: {js}");
    assert!(js.contains("function Runnable$class1()"), "got: {js}");
    assert!(js.contains("$p.addMethod($this_1, 'run', run$0, false);"), "got: {js}");
}

#[test]
fn string_and_char_literals_round_trip() {
    let js = emit("String s = \"hello \\\"world\\\"\"; char c = 'x';");
    assert!(js.contains("\"hello \\\"world\\\"\""), "got: {js}");
    assert!(js.contains("(new $p.Character('x'))"), "got: {js}");
}

#[test]
fn dollar_identifiers_round_trip() {
    let js = emit("int a$b = 1; int __x0041 = 2;");
    assert!(js.contains("var a$b = 1"), "got: {js}");
    assert!(js.contains("__x0041 = 2"), "got: {js}");
}

#[test]
fn imports_are_dropped() {
    let js = emit("import processing.opengl.*; int x = 1;");
    assert!(!js.contains("import"), "got: {js}");
    assert!(js.contains("var x = 1"), "got: {js}");
}

#[test]
fn unbalanced_brackets_report_offset() {
    let err = transform("void f() { )", &TransformOptions::default()).unwrap_err();
    assert!(err.to_string().starts_with("unbalanced brackets at offset"));
}

#[test]
fn host_globals_resolve_but_locals_win() {
    let js = emit("int width = 3; float h = height;");
    assert!(js.contains("var width = 3"), "got: {js}");
    assert!(js.contains("$p.height"), "got: {js}");
}

#[test]
fn option_supplied_names_resolve_to_host() {
    let mut options = TransformOptions::default();
    options.library_exports.push("glitch".into());
    let js = transform("glitch(2);", &options).expect("transform");
    assert!(js.contains("$p.glitch(2)"), "got: {js}");
}

#[test]
fn keypressed_value_versus_call() {
    let js = emit("void draw() { if (keyPressed) { frameRate(30); } }");
    assert!(js.contains("$p.__keyPressed"), "got: {js}");
    assert!(js.contains("$p.frameRate(30)"), "got: {js}");
}

#[test]
fn pixels_proxy_emits_host_calls() {
    let js = emit("void draw() { pixels[3] = c; }");
    assert!(js.contains("$p.pixels.setPixel(3, c)"), "got: {js}");
}

#[test]
fn default_field_values_follow_declared_type() {
    let js = emit("class A { int n; boolean b; color c; PVector v; }");
    assert!(js.contains("$this_1.n = 0;"), "got: {js}");
    assert!(js.contains("$this_1.b = false;"), "got: {js}");
    assert!(js.contains("$this_1.c = 0x00000000;"), "got: {js}");
    assert!(js.contains("$this_1.v = null;"), "got: {js}");
}

#[test]
fn constructor_without_super_gets_super_chain() {
    let js = emit("class A { int x; A() { x = 1; } }");
    assert!(js.contains("$superCstr();"), "got: {js}");
}

#[test]
fn generics_are_erased_end_to_end() {
    let js = emit("HashMap<String, ArrayList<Integer>> table = new HashMap<String, ArrayList<Integer>>();");
    assert!(!js.contains('<'), "got: {js}");
    assert!(js.contains("new $p.HashMap()"), "got: {js}");
}
