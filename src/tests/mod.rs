use crate::{
    compile,
    language::errors::{CompileError, ErrorCategory, ErrorKind},
};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn go(source: &str) -> String {
    compile(source, 4).unwrap_or_else(|err| panic!("unexpected compile error: {err}"))
}

fn error(source: &str) -> CompileError {
    compile(source, 4).expect_err("source should be rejected")
}

fn assert_rejected(source: &str, kind: ErrorKind, line: usize) {
    let err = error(source);
    assert_eq!((err.kind, err.line), (kind, line), "{err}");
}

#[test]
fn tuples_and_arrays_render_as_go_aggregates() {
    let source = indoc! {"
        // sums two ints
        function add(a: int, b: int) -> int = {
            a + b
        }

        function main() -> IO = {
            let t: (int, float) = (4, 3.14)
            let mut nums: int[3] = [1, 2, 3]
            nums[1] = 9
            println!(t.1)
            println!(add(nums[0], 2))
        }
    "};
    let expected = indoc! {r#"
        package main

        import "fmt"

        type tuple2[T0 any, T1 any] struct {
            v0 T0
            v1 T1
        }

        func add(a int, b int) int {
            return a + b
        }

        func main() {
            var t tuple2[int, float64] = tuple2[int, float64]{v0: 4, v1: 3.14}
            var nums [3]int = [3]int{1, 2, 3}
            nums[1] = 9
            fmt.Println(t.v1)
            fmt.Println(add(nums[0], 2))
        }
    "#};
    assert_eq!(go(source), expected);
}

#[test]
fn conditionals_and_loops_map_one_to_one() {
    let source = indoc! {r#"
        function main() -> IO = {
            let mut i: int = 0
            loop i < 10 {
                if i == 5 {
                    break
                } else if i == 2 {
                    i = i + 2
                    continue
                } else {
                    print!(i)
                }
                i = i + 1
            }
            panic!("done")
        }
    "#};
    let expected = indoc! {r#"
        package main

        import "fmt"

        func main() {
            var i int = 0
            for i < 10 {
                if i == 5 {
                    break
                } else if i == 2 {
                    i = i + 2
                    continue
                } else {
                    fmt.Print(i)
                }
                i = i + 1
            }
            panic("done")
        }
    "#};
    assert_eq!(go(source), expected);
}

#[test]
fn nested_arrays_and_tuple_returns() {
    let source = indoc! {"
        function pair(grid: int[2][2]) -> (int, bool) = {
            (grid[1][0], true)
        }

        function main() -> IO = {
            let grid: int[2][2] = [[1, 2], [3, 4]]
            let p: (int, bool) = pair(grid)
            println!(p.0 * -2)
        }
    "};
    let expected = indoc! {r#"
        package main

        import "fmt"

        type tuple2[T0 any, T1 any] struct {
            v0 T0
            v1 T1
        }

        func pair(grid [2][2]int) tuple2[int, bool] {
            return tuple2[int, bool]{v0: grid[1][0], v1: true}
        }

        func main() {
            var grid [2][2]int = [2][2]int{{1, 2}, {3, 4}}
            var p tuple2[int, bool] = pair(grid)
            fmt.Println(p.v0 * -2)
        }
    "#};
    assert_eq!(go(source), expected);
}

#[test]
fn grouping_braces_become_parentheses() {
    let source = indoc! {"
        function main() -> IO = {
            let x: int = {1 + 2} * 3
            let ok: bool = !(x > 4) || (x == 9)
            println!(ok)
        }
    "};
    let out = go(source);
    assert!(out.contains("var x int = (1 + 2) * 3\n"), "{out}");
    assert!(out.contains("var ok bool = !(x > 4) || (x == 9)\n"), "{out}");
}

#[test]
fn carriers_are_emitted_once_per_arity_in_ascending_order() {
    let source = indoc! {"
        function main() -> IO = {
            let c: (int, int, int) = (1, 2, 3)
            let a: (int, bool) = (1, true)
            let b: (string, byte) = (\"s\", 'b')
        }
    "};
    let out = go(source);
    let two = out.find("type tuple2[").expect("tuple2 carrier");
    let three = out.find("type tuple3[").expect("tuple3 carrier");
    assert!(two < three);
    assert_eq!(out.matches("type tuple2[").count(), 1);
    assert!(!out.contains("import"));
    assert_eq!(go(source), out);
}

#[test]
fn calls_accept_recursion_and_aggregate_literals() {
    let source = indoc! {"
        function fact(n: int) -> int = {
            let mut result: int = 1
            if n > 1 {
                result = n * fact(n - 1)
            }
            result
        }

        function sum(values: int[3]) -> int = {
            values[0] + values[1] + values[2]
        }

        function main() -> IO = {
            println!(fact(5) + sum([1, 2, 3]))
        }
    "};
    let out = go(source);
    assert!(out.contains("fmt.Println(fact(5) + sum([3]int{1, 2, 3}))"), "{out}");
    assert!(out.contains("result = n * fact(n - 1)"), "{out}");
}

#[test]
fn program_shape_errors() {
    assert_rejected("function helper() -> int = {\n    1\n}\n", ErrorKind::MissingMain, 3);
    assert_rejected(
        "let x: int = 1\nfunction main() -> IO = {\n}\n",
        ErrorKind::DisallowedTopLevel,
        1,
    );
    assert_rejected("function main() -> int = {\n    1\n}\n", ErrorKind::MalformedFunction, 1);
    assert_rejected("function main(x: int) -> IO = {\n}\n", ErrorKind::MalformedFunction, 1);
    assert_rejected("function f() -> IO = {\n}\n", ErrorKind::MalformedFunction, 1);
    assert_rejected("function main() -> IO = {\n    let x: int = 1\n", ErrorKind::UnclosedScope, 1);
    assert_rejected("function main() -> IO {\n}\n", ErrorKind::MalformedFunction, 1);

    let nested = indoc! {"
        function main() -> IO = {
            function inner() -> int = {
                1
            }
            println!(inner())
        }
    "};
    assert_rejected(nested, ErrorKind::NestedFunction, 2);

    let in_block = indoc! {"
        function main() -> IO = {
            if true {
                function g() -> int = {
                    1
                }
            }
        }
    "};
    assert_rejected(in_block, ErrorKind::NestedFunction, 3);
}

#[test]
fn return_domain_is_enforced() {
    let source = indoc! {"
        function five() -> int[5] = {
            5
        }

        function main() -> IO = {
        }
    "};
    assert_rejected(source, ErrorKind::ReturnTypeMismatch, 2);

    let missing = "function f() -> int = {\n    let x: int = 1\n}\nfunction main() -> IO = {\n}\n";
    assert_rejected(missing, ErrorKind::ReturnTypeMismatch, 3);

    let dead = "function f() -> int = {\n    1\n    let x: int = 2\n}\nfunction main() -> IO = {\n}\n";
    assert_rejected(dead, ErrorKind::DeadCode, 3);

    let nested = indoc! {"
        function f() -> int = {
            if true {
                1
            }
            2
        }
        function main() -> IO = {
        }
    "};
    assert_rejected(nested, ErrorKind::ReturnOutsideFunction, 3);
}

#[test]
fn scopes_isolate_and_never_shadow() {
    let isolated = indoc! {"
        function main() -> IO = {
            if true {
                let inner: int = 1
            }
            println!(inner)
        }
    "};
    assert_rejected(isolated, ErrorKind::NotFound, 5);

    let shadow = indoc! {"
        function twice(n: int) -> int = {
            let n: int = 2
            n
        }
        function main() -> IO = {
        }
    "};
    assert_rejected(shadow, ErrorKind::AlreadyDeclared, 2);

    let immutable = "function main() -> IO = {\n    let x: int = 1\n    x = 2\n}\n";
    let err = error(immutable);
    assert_eq!(err.kind, ErrorKind::ImmutableAssignment);
    assert_eq!(err.category(), ErrorCategory::Scope);
    assert!(err.help.is_some());
}

#[test]
fn loops_need_an_exit_of_their_own() {
    let no_break = "function main() -> IO = {\n    loop true {\n        print!(1)\n    }\n}\n";
    assert_rejected(no_break, ErrorKind::NoExitCondition, 2);

    let inner_only = indoc! {"
        function main() -> IO = {
            loop true {
                loop true {
                    break
                }
            }
        }
    "};
    assert_rejected(inner_only, ErrorKind::NoExitCondition, 2);

    let stray = "function main() -> IO = {\n    break\n}\n";
    assert_rejected(stray, ErrorKind::BreakOutsideLoop, 2);

    let not_bool = "function main() -> IO = {\n    loop 1 {\n        break\n    }\n}\n";
    assert_rejected(not_bool, ErrorKind::NonBooleanCondition, 2);
}

#[test]
fn else_must_follow_its_if() {
    let split = indoc! {"
        function main() -> IO = {
            if true {
                print!(1)
            }
            else {
                print!(2)
            }
        }
    "};
    assert_rejected(split, ErrorKind::MisplacedElse, 5);

    let after_else = indoc! {"
        function main() -> IO = {
            if true {
                print!(1)
            } else {
                print!(2)
            } else {
                print!(3)
            }
        }
    "};
    assert_rejected(after_else, ErrorKind::MisplacedElse, 6);

    let conditioned = "function main() -> IO = {\n    if true {\n    } else false {\n    }\n}\n";
    assert_rejected(conditioned, ErrorKind::MalformedConditional, 3);
}

#[test]
fn values_must_match_declared_types() {
    let cases = [
        ("let x: int = 1.5", ErrorKind::TypeMismatch),
        ("let x: bool = 1 < 1 + 1", ErrorKind::MixedTypes),
        ("let x: float = 1.0 + 1", ErrorKind::TypeMismatch),
        ("let x: int[3] = [1, 2]", ErrorKind::TypeMismatch),
        ("let x: (int, bool) = (1, 2)", ErrorKind::TypeMismatch),
        ("let x: string = \"open", ErrorKind::UnterminatedLiteral),
        ("let x: int = (1 + 2", ErrorKind::UnbalancedBrackets),
        ("let x: int = 1 & 2", ErrorKind::InvalidOperator),
        ("let x: int = 007", ErrorKind::InvalidLiteral),
        ("let x: int = 99999999999999999999", ErrorKind::InvalidLiteral),
        ("let x: int = 1 / 0", ErrorKind::DivisionByZero),
        ("let b: byte = '\\q'", ErrorKind::InvalidLiteral),
        ("let panic: int = 1", ErrorKind::InvalidIdentifier),
        ("let x: number = 1", ErrorKind::MalformedDeclaration),
        ("let for: int = 1", ErrorKind::InvalidIdentifier),
        ("let x: IO = 1", ErrorKind::MalformedDeclaration),
        ("shout!(1)", ErrorKind::UnknownMacro),
        ("panic!(1)", ErrorKind::TypeMismatch),
        ("println!()", ErrorKind::EmptyExpression),
        ("if 1 {\n    }", ErrorKind::NonBooleanCondition),
    ];
    for (body, kind) in cases {
        let source = format!("function main() -> IO = {{\n    {body}\n}}\n");
        assert_eq!(error(&source).kind, kind, "{body}");
    }
}

#[test]
fn literal_indices_are_bounds_checked() {
    let read = indoc! {"
        function main() -> IO = {
            let nums: int[3] = [1, 2, 3]
            println!(nums[3])
        }
    "};
    assert_rejected(read, ErrorKind::IndexOutOfBounds, 3);

    let write = indoc! {"
        function main() -> IO = {
            let mut grid: int[2][2] = [[1, 2], [3, 4]]
            grid[0][2] = 5
        }
    "};
    assert_rejected(write, ErrorKind::IndexOutOfBounds, 3);

    let negative = indoc! {"
        function main() -> IO = {
            let nums: int[3] = [1, 2, 3]
            println!(nums[-1])
        }
    "};
    assert_rejected(negative, ErrorKind::IndexOutOfBounds, 3);

    let negative_write = indoc! {"
        function main() -> IO = {
            let mut nums: int[3] = [1, 2, 3]
            nums[-1] = 4
        }
    "};
    assert_rejected(negative_write, ErrorKind::IndexOutOfBounds, 3);

    let field = indoc! {"
        function main() -> IO = {
            let t: (int, int) = (1, 2)
            println!(t.2)
        }
    "};
    assert_rejected(field, ErrorKind::IndexOutOfBounds, 3);
}

#[test]
fn calls_are_checked_positionally() {
    let source = indoc! {"
        function scale(v: float, by: int) -> float = {
            v
        }
        function main() -> IO = {
            println!(scale(2, 1.5))
        }
    "};
    assert_rejected(source, ErrorKind::ArgumentMismatch, 5);
}

#[test]
fn comments_do_not_shift_reported_lines() {
    let source = indoc! {r#"
        // header comment
        function main() -> IO = {
            // about to fail
            println!("// not a comment")
            println!(missing)
        }
    "#};
    assert_rejected(source, ErrorKind::NotFound, 5);
}
