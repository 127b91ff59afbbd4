use cmaid::cmake::man;
use cmaid::help::{self, HelpTopic};
use cmaid::parser::{CMakeParser, tokenize};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const LISTS: &str = r#"cmake_minimum_required(VERSION 2.8)
project(bench CXX)

# Options
option(WITH_TESTS "Build tests" ON)
set(SOURCES
    src/main.cpp   # entry point
    src/util.cpp
    src/parser.cpp
)
set(CMAKE_CXX_FLAGS "${CMAKE_CXX_FLAGS} -Wall -Wextra")
if((WITH_TESTS) AND NOT WIN32)
  add_subdirectory(tests)
endif()
add_executable(bench ${SOURCES})
target_link_libraries(bench PRIVATE m)
"#;

/// A `--help-man` page with `items` entries in each itemized section.
fn man_page(items: usize) -> Vec<String> {
    let mut lines = vec![".SH GENERATORS".to_string()];
    for i in 0..8 {
        lines.push(".TP".to_string());
        lines.push(format!(".B Generator {}", i));
        lines.push("Generates files.".to_string());
    }
    for section in ["COMMANDS", "PROPERTIES", "MODULES", "VARIABLES"] {
        lines.push(format!(".SH {}", section));
        for i in 0..items {
            lines.push(".TP".to_string());
            lines.push(format!(".B item_{}", i));
            lines.push(format!("Description of item {} with \\-escapes.", i));
            lines.push(".nf".to_string());
            lines.push("  item(ARG1 ARG2)".to_string());
            lines.push(".fi".to_string());
        }
    }
    lines.push(".SH COPYRIGHT".to_string());
    lines.push("Copyright 2000\\-2012 Kitware, Inc.".to_string());
    lines
}

fn bench_man_page(c: &mut Criterion) {
    let page = man_page(200);
    c.bench_function("parse_man_page_200", |b| {
        b.iter(|| man::parse_man_page(black_box(&page)))
    });
}

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_cmakelists", |b| {
        b.iter(|| tokenize(black_box(LISTS)))
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_cmakelists", |b| {
        b.iter(|| {
            let mut parser = CMakeParser::new();
            parser.parse(black_box(LISTS)).unwrap();
            parser
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let data = man::parse_man_page(&man_page(500));
    c.bench_function("filter_commands", |b| {
        b.iter(|| help::list(&data, HelpTopic::Commands, black_box(Some("item_4*"))).len())
    });
}

criterion_group!(
    benches,
    bench_man_page,
    bench_tokenize,
    bench_parse,
    bench_filter
);
criterion_main!(benches);
