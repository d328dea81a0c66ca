use chrono::NaiveDate;
use datasheet_core::{CellType, CellValue, CsvOptions, EXPR_ERROR, FormatOptions, Grid, Operation, SortOrder};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn options() -> FormatOptions {
    FormatOptions::default().with_today(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap())
}

fn countries() -> Grid {
    Grid::load_with_options(&fixture("countries.csv"), &CsvOptions::default(), options()).unwrap()
}

fn countries_with_names() -> Grid {
    let csv = CsvOptions::default().with_column_names(true);
    Grid::load_with_options(&fixture("countries.csv"), &csv, options()).unwrap()
}

fn row_text(grid: &Grid, index: isize) -> String {
    grid.row(index).display(grid.options()).to_string()
}

fn column_text(grid: &Grid, index: isize) -> String {
    grid.column(index).display(grid.options()).to_string()
}

fn name_at(grid: &Grid, row: usize) -> String {
    grid.value(0, row).unwrap()
}

const COUNTRIES_FRAME: &str = concat!(
    "      Name |    Capital | Population | Forest ... |        GDP |  Seashore?\n",
    "   Germany |     Berlin |   83149300 |       0.32 |      52556 |       true\n",
    "   Austria |     Vienna |    8858775 |      0.462 |      53879 |      false\n",
    "    Sweden |  Stockholm |   10327589 |       0.57 |      51405 |       true\n",
    "    Russia |     Moscow |  144526636 |     0.4976 |      25763 |       true\n",
    "  Paraguay |   Asunción |    6943739 |      0.443 |      13109 |      false\n",
    "     Japan |      Tokyo |  126860000 |       0.67 |      42067 |       true\n",
    " Australia |   Canberra |   25324713 |       0.17 |      49378 |       true\n",
    "    Brazil |   Brasília |  208360000 |      0.624 |      15553 |       true\n",
    "South K... |      Seoul |   51629512 |     0.6335 |      38824 |       true\n",
    "     Qatar |       Doha |    2700000 |          0 |     128647 |       true\n",
);

#[test]
fn test_loaded_grid_renders_as_frame() {
    let grid = countries();
    assert_eq!(grid.row_count(), 11);
    assert_eq!(grid.column_count(), 6);
    assert_eq!(grid.to_string(), COUNTRIES_FRAME);
}

#[test]
fn test_set_values_of_different_kinds() {
    let mut grid = Grid::with_options(options());
    grid.set_value(0, 0, "Germany");
    grid.set_value(1, 0, "Berlin");
    grid.set_value(2, 0, 83149300);
    grid.set_value(3, 0, 0.32);
    grid.set_value(4, 0, 52.556);
    grid.set_value(5, 0, 0b1001);
    grid.set_value(6, 0, 0xaf);
    grid.set_value(7, 0, 100_i64);
    grid.set_value(8, 0, 'X');
    grid.set_value(9, 0, true);
    assert_eq!(
        row_text(&grid, 0),
        "Germany,Berlin,83149300,0.32,52.556,9,175,100,X,true"
    );

    let before = grid.to_string();
    grid.set_value(1000, 0, "test");
    grid.set_value(0, 1000, "test");
    grid.set_value(1000, 1000, "test");
    assert_eq!(grid.to_string(), before);
    grid.set_value(0, 0, "test");
    assert_ne!(grid.to_string(), before);
}

#[test]
fn test_default_grid() {
    let grid = Grid::with_options(options());
    assert_eq!(grid.row_count(), 10);
    assert_eq!(grid.column_count(), 10);
    assert_eq!(grid.size(), 100);
    assert_eq!(row_text(&grid, 0), "");
}

#[test]
fn test_count_ignores_blank_cells() {
    let mut grid = Grid::with_capacity_and_options(5, options());
    let blank = || CellValue::from("");
    grid.set_row(
        0,
        vec![CellValue::from(1), CellValue::from(2), blank(), CellValue::from("   "), blank()],
    );
    grid.set_row(1, vec![blank(), blank(), CellValue::from("   "), blank(), blank()]);
    grid.set_row(2, [1, 2, 3, 4, 5]);
    assert_eq!(grid.count(), 7);
    assert_eq!(grid.size(), 25);
    assert_eq!(grid.row(0).count(), 2);
    assert_eq!(grid.row(0).size(), 5);
    assert_eq!(grid.row(1).count(), 0);
    assert_eq!(grid.row(2).count(), 5);
}

#[test]
fn test_rows_grow_and_shift() {
    let mut grid = countries();
    let test = |label: &str, n: usize| vec![label.to_string(); n];

    grid.push_row(test("TEST1", 6));
    assert_eq!(row_text(&grid, grid.row_count() as isize), "TEST1,TEST1,TEST1,TEST1,TEST1,TEST1");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (12, 6, 72));

    grid.add_row(5, test("TEST2", 6));
    assert_eq!(row_text(&grid, 4), "Russia,Moscow,144526636,0.4976,25763,true");
    assert_eq!(row_text(&grid, 5), "TEST2,TEST2,TEST2,TEST2,TEST2,TEST2");
    assert_eq!(row_text(&grid, 6), "Paraguay,Asunción,6943739,0.443,13109,false");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (13, 6, 78));

    grid.push_row(test("TEST3", 3));
    assert_eq!(row_text(&grid, 100), "TEST3,TEST3,TEST3");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (14, 6, 84));

    grid.push_row(test("TEST4", 8));
    assert_eq!(row_text(&grid, 100), "TEST4,TEST4,TEST4,TEST4,TEST4,TEST4,TEST4,TEST4");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (15, 8, 120));

    grid.add_row(4, test("TEST5", 3));
    assert_eq!(row_text(&grid, 3), "Sweden,Stockholm,10327589,0.57,51405,true");
    assert_eq!(row_text(&grid, 4), "TEST5,TEST5,TEST5");
    assert_eq!(row_text(&grid, 5), "Russia,Moscow,144526636,0.4976,25763,true");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (16, 8, 128));

    grid.add_row(9, test("TEST6", 10));
    assert_eq!(row_text(&grid, 8), "Japan,Tokyo,126860000,0.67,42067,true");
    assert_eq!(row_text(&grid, 9), test("TEST6", 10).join(","));
    assert_eq!(row_text(&grid, 10), "Australia,Canberra,25324713,0.17,49378,true");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (17, 10, 170));
}

#[test]
fn test_row_get_set_remove() {
    let mut grid = countries();
    assert_eq!(row_text(&grid, 0), "Name,Capital,Population,Forest Area,GDP,Seashore?");
    assert_eq!(row_text(&grid, 100), "Qatar,Doha,2700000,0,128647,true");
    assert_eq!(row_text(&grid, -1), "Name,Capital,Population,Forest Area,GDP,Seashore?");

    grid.set_row(0, ["foo", "bar", "baz", "123", "456", "789", "987"]);
    assert_eq!(row_text(&grid, 0), "foo,bar,baz,123,456,789,987");

    grid.remove_row(0);
    assert_eq!(row_text(&grid, 0), "Germany,Berlin,83149300,0.32,52556,true");
}

#[test]
fn test_columns_grow_and_shift() {
    let mut grid = countries();
    let test = |label: &str, n: usize| vec![label.to_string(); n];
    let population =
        "Population,83149300,8858775,10327589,144526636,6943739,126860000,25324713,208360000,51629512,2700000";

    grid.push_column(test("TEST1", 11));
    assert_eq!(column_text(&grid, grid.column_count() as isize), test("TEST1", 11).join(","));
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (11, 7, 77));

    grid.add_column(2, test("TEST2", 11));
    assert_eq!(
        column_text(&grid, 1),
        "Capital,Berlin,Vienna,Stockholm,Moscow,Asunción,Tokyo,Canberra,Brasília,Seoul,Doha"
    );
    assert_eq!(column_text(&grid, 2), test("TEST2", 11).join(","));
    assert_eq!(column_text(&grid, 3), population);
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (11, 8, 88));

    grid.push_column(test("TEST3", 3));
    assert_eq!(column_text(&grid, 100), "TEST3,TEST3,TEST3");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (11, 9, 99));

    grid.push_column(test("TEST4", 12));
    assert_eq!(column_text(&grid, 100), test("TEST4", 12).join(","));
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (12, 10, 120));

    grid.add_column(4, test("TEST5", 3));
    assert_eq!(column_text(&grid, 3), population);
    assert_eq!(column_text(&grid, 4), "TEST5,TEST5,TEST5");
    assert_eq!(
        column_text(&grid, 5),
        "Forest Area,0.32,0.462,0.57,0.4976,0.443,0.67,0.17,0.624,0.6335,0"
    );
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (12, 11, 132));

    grid.add_column(4, test("TEST6", 15));
    assert_eq!(column_text(&grid, 3), population);
    assert_eq!(column_text(&grid, 4), test("TEST6", 15).join(","));
    assert_eq!(column_text(&grid, 5), "TEST5,TEST5,TEST5");
    assert_eq!((grid.row_count(), grid.column_count(), grid.size()), (15, 12, 180));
}

#[test]
fn test_column_get_set_remove() {
    let mut grid = countries();
    let names = "Name,Germany,Austria,Sweden,Russia,Paraguay,Japan,Australia,Brazil,South Korea,Qatar";
    assert_eq!(column_text(&grid, 0), names);
    assert_eq!(column_text(&grid, -1), names);
    assert_eq!(
        column_text(&grid, 100),
        "Seashore?,true,false,true,true,false,true,true,true,true,true"
    );

    grid.remove_column(0);
    assert_eq!(
        column_text(&grid, 0),
        "Capital,Berlin,Vienna,Stockholm,Moscow,Asunción,Tokyo,Canberra,Brasília,Seoul,Doha"
    );

    grid.set_column(0, ["foo", "bar", "baz", "123", "456", "789", "987", "654", "321", "foo", "bar"]);
    assert_eq!(column_text(&grid, 0), "foo,bar,baz,123,456,789,987,654,321,foo,bar");
}

#[test]
fn test_column_names_follow_structure() {
    let csv = CsvOptions::default().with_column_names(true);
    let mut grid = Grid::load_with_options(&fixture("simple.csv"), &csv, options()).unwrap();

    grid.push_column(vec![CellValue::from("Seashore?"), CellValue::from(true), CellValue::from(false)]);
    grid.push_column(vec![
        CellValue::from("test"),
        CellValue::from(123),
        CellValue::from(456),
        CellValue::from(789),
        CellValue::from(666),
    ]);
    grid.push_row(["foo", "bar", "baz", "foo1", "bar2", "baz2", "foo3", "bar3"]);
    grid.push_column(vec![
        CellValue::from("first"),
        CellValue::from(987),
        CellValue::from(654),
        CellValue::from(321),
        CellValue::from(123),
        CellValue::from(456),
        CellValue::from(789),
        CellValue::from(987),
    ]);

    let expected = concat!(
        "[    Name] | [ Capital] | [Popul...] | [Seash...] | [    test] | [  COLUMN] | [  COLUMN] | [  COLUMN] | [   first]\n",
        "   Germany |     Berlin |   83149300 |       true |        123 |            |            |            |        987\n",
        "   Austria |     Vienna |    8858775 |      false |        456 |            |            |            |        654\n",
        "           |            |            |            |        789 |            |            |            |        321\n",
        "           |            |            |            |        666 |            |            |            |        123\n",
        "       foo |        bar |        baz |       foo1 |       bar2 |       baz2 |       foo3 |       bar3 |        456\n",
        "           |            |            |            |            |            |            |            |        789\n",
        "           |            |            |            |            |            |            |            |        987\n",
    );
    assert_eq!(grid.to_string(), expected);

    grid.set_column_name(5, "test1");
    grid.set_column_name(6, "test2");
    grid.set_column_name(7, "test3");
    assert_eq!(
        grid.to_string().lines().next().unwrap(),
        "[    Name] | [ Capital] | [Popul...] | [Seash...] | [    test] | [   test1] | [   test2] | [   test3] | [   first]"
    );

    let opts = grid.options().clone();
    let text = |name: &str| grid.column_by_name(name).map(|c| c.display(&opts).to_string());
    assert_eq!(text("Name").as_deref(), Some("Germany,Austria,foo"));
    assert_eq!(text("Seashore?").as_deref(), Some("true,false,foo1"));
    assert_eq!(text("first").as_deref(), Some("987,654,321,123,456,789,987"));
    assert_eq!(text("foo"), None);
}

#[test]
fn test_sort_same_order_for_all_keys() {
    let mut grid = countries();

    grid.sort_ascending(&[5, 0]);
    assert_eq!(name_at(&grid, 0), "Name");
    assert_eq!(name_at(&grid, 1), "Austria");
    assert_eq!(name_at(&grid, 2), "Paraguay");
    assert_eq!(name_at(&grid, 3), "Australia");
    assert_eq!(name_at(&grid, 10), "Sweden");

    grid.sort_ascending(&[5, 4]);
    assert_eq!(name_at(&grid, 4), "Russia");

    grid.sort_descending(&[5, 3]);
    assert_eq!(name_at(&grid, 0), "Japan");
    assert_eq!(name_at(&grid, 3), "Sweden");
    assert_eq!(name_at(&grid, 8), "Austria");
    assert_eq!(name_at(&grid, 9), "Paraguay");
    assert_eq!(name_at(&grid, 10), "Name");
}

#[test]
fn test_sort_mixed_orders() {
    let mut grid = countries();

    grid.sort(&[(5, SortOrder::Descending), (0, SortOrder::Ascending)]);
    assert_eq!(name_at(&grid, 0), "Australia");
    assert_eq!(name_at(&grid, 10), "Name");

    grid.sort(&[(5, SortOrder::Descending), (1, SortOrder::Ascending)]);
    assert_eq!(grid.value(1, 0).as_deref(), Some("Berlin"));

    grid.sort(&[(5, SortOrder::Ascending), (0, SortOrder::Descending)]);
    assert_eq!(name_at(&grid, 0), "Name");
    assert_eq!(name_at(&grid, 1), "Paraguay");

    grid.sort(&[(5, SortOrder::Ascending), (4, SortOrder::Descending)]);
    assert_eq!(name_at(&grid, 1), "Austria");
    assert_eq!(name_at(&grid, 3), "Qatar");
}

#[test]
fn test_single_and_multi_key_sort_agree() {
    let mut single = countries();
    single.sort_descending(&[5, 3]);
    let mut multi = countries();
    multi.sort(&[(5, SortOrder::Descending), (3, SortOrder::Descending)]);
    assert_eq!(name_at(&single, 0), "Japan");
    assert_eq!(single.to_string(), multi.to_string());
}

#[test]
fn test_out_of_range_sort_key_changes_nothing() {
    let mut grid = countries();
    grid.sort_ascending(&[100]);
    assert_eq!(grid.to_string(), COUNTRIES_FRAME);
    grid.sort_ascending(&[0, 100]);
    assert_eq!(grid.to_string(), COUNTRIES_FRAME);
    grid.sort_ascending(&[100, 0]);
    assert_eq!(grid.to_string(), COUNTRIES_FRAME);
    grid.sort_descending(&[100]);
    assert_eq!(grid.to_string(), COUNTRIES_FRAME);
    grid.sort_descending(&[0, 100]);
    assert_eq!(grid.to_string(), COUNTRIES_FRAME);
    grid.sort(&[(6, SortOrder::Ascending)]);
    assert_eq!(grid.to_string(), COUNTRIES_FRAME);
}

#[test]
fn test_slices() {
    let grid = countries();
    let opts = grid.options();
    let text = |records: Vec<datasheet_core::Record>| {
        records
            .iter()
            .map(|r| r.display(opts).to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(
        text(grid.slice(2, 2, 4, 4).unwrap()),
        vec!["8858775,0.462,53879", "10327589,0.57,51405", "144526636,0.4976,25763"]
    );
    assert_eq!(
        text(grid.slice(0, 0, 2, 2).unwrap()),
        vec!["Name,Capital,Population", "Germany,Berlin,83149300", "Austria,Vienna,8858775"]
    );

    assert!(grid.slice(24, 2, 4, 4).is_none());
    assert!(grid.slice(2, 2, 4, 42).is_none());
    assert!(grid.slice(2, 2, 2, 4).is_none());
    assert!(grid.slice(2, 4, 4, 4).is_none());
}

#[test]
fn test_column_types_format_values() {
    let mut grid = countries();
    grid.set_options(options().with_decimal_separator(','));
    assert_eq!(grid.column(2).cell_type(), CellType::Text);

    grid.set_cell_type_for_column(2, CellType::Number);
    grid.set_cell_type_for_column(3, CellType::Percentage);
    grid.set_cell_type_for_column(4, CellType::Currency);

    assert_eq!(
        column_text(&grid, 2),
        "Population,\"83149300,00\",\"8858775,00\",\"10327589,00\",\"144526636,00\",\"6943739,00\",\"126860000,00\",\"25324713,00\",\"208360000,00\",\"51629512,00\",\"2700000,00\""
    );
    assert_eq!(
        column_text(&grid, 3),
        "Forest Area,\"32,00 %\",\"46,20 %\",\"57,00 %\",\"49,76 %\",\"44,30 %\",\"67,00 %\",\"17,00 %\",\"62,40 %\",\"63,35 %\",\"0,00 %\""
    );
    assert_eq!(
        column_text(&grid, 4),
        "GDP,\"52556,00 €\",\"53879,00 €\",\"51405,00 €\",\"25763,00 €\",\"13109,00 €\",\"42067,00 €\",\"49378,00 €\",\"15553,00 €\",\"38824,00 €\",\"128647,00 €\""
    );
    assert_eq!(grid.column(2).cell_type(), CellType::Number);
    assert_eq!(grid.column(3).cell_type(), CellType::Percentage);
    assert_eq!(grid.column(4).cell_type(), CellType::Currency);
    assert_eq!(grid.cell_type(4, 0), Some(CellType::Currency));
}

#[test]
fn test_row_types_format_values() {
    let mut grid = Grid::with_options(options().with_decimal_separator(','));
    let ints = [123, 456, 789, 987, 654, 321, 123, 456, 789, 565];
    grid.add_row(0, ints);
    grid.add_row(0, ints);
    grid.add_row(0, [0.123, 0.456, 0.789, 0.987, 0.654, 0.321, 0.123, 0.456, 0.789, 0.565]);
    assert_eq!(row_text(&grid, 0), "0.123,0.456,0.789,0.987,0.654,0.321,0.123,0.456,0.789,0.565");
    assert_eq!(row_text(&grid, 1), "123,456,789,987,654,321,123,456,789,565");
    assert_eq!(grid.row(0).cell_type(), CellType::Text);

    grid.set_cell_type_for_row(0, CellType::Percentage);
    grid.set_cell_type_for_row(1, CellType::Number);
    grid.set_cell_type_for_row(2, CellType::Currency);
    assert_eq!(
        row_text(&grid, 0),
        "\"12,30 %\",\"45,60 %\",\"78,90 %\",\"98,70 %\",\"65,40 %\",\"32,10 %\",\"12,30 %\",\"45,60 %\",\"78,90 %\",\"56,50 %\""
    );
    assert_eq!(
        row_text(&grid, 1),
        "\"123,00\",\"456,00\",\"789,00\",\"987,00\",\"654,00\",\"321,00\",\"123,00\",\"456,00\",\"789,00\",\"565,00\""
    );
    assert_eq!(
        row_text(&grid, 2),
        "\"123,00 €\",\"456,00 €\",\"789,00 €\",\"987,00 €\",\"654,00 €\",\"321,00 €\",\"123,00 €\",\"456,00 €\",\"789,00 €\",\"565,00 €\""
    );
    assert_eq!(grid.row(0).cell_type(), CellType::Percentage);
    assert_eq!(grid.row(1).cell_type(), CellType::Number);
    assert_eq!(grid.row(2).cell_type(), CellType::Currency);
    assert_eq!(
        grid.row(2).structure().split(" | ").next(),
        Some("idx 0: CURRENCY")
    );
}

#[test]
fn test_aggregates_over_loaded_data() {
    let mut grid = countries_with_names();
    grid.push_row(["Total"]);
    grid.set_expression(4, 10, Operation::Sum, 4, 0, 4, 9);
    grid.set_expression(3, 10, Operation::Count, 4, 0, 4, 9);
    grid.set_expression(2, 10, Operation::Avg, 4, 0, 4, 9);
    assert_eq!(grid.value(4, 10).as_deref(), Some("471181.0"));
    assert_eq!(grid.value(3, 10).as_deref(), Some("10"));
    assert_eq!(grid.value(2, 10).as_deref(), Some("47118.1"));

    grid.set_value(4, 0, 0);
    assert_eq!(grid.value(4, 10).as_deref(), Some("418625.0"));

    grid.set_cell_type(4, 1, CellType::Currency);
    assert_eq!(grid.value(4, 10).as_deref(), Some("0.0"));
    grid.set_cell_type(4, 1, CellType::Text);

    grid.remove_row(0);
    assert_eq!(grid.value(4, 9).as_deref(), Some(EXPR_ERROR));
}

#[test]
fn test_group_by_and_partition() {
    let grid = countries_with_names();
    let opts = grid.options().clone();
    let groups = grid.group_by(|row| row.get(5).map(|c| c.borrow().value(&opts)));
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].row_count(), 8);
    assert_eq!(groups[1].row_count(), 2);
    assert_eq!(groups[1].column_by_name("Name").unwrap().display(&opts).to_string(), "Austria,Paraguay");
    assert_eq!(groups[0].column_names(), grid.column_names());

    let parts = grid.partition(|row| {
        row.get(2)
            .is_some_and(|c| c.borrow().value_as_double(&opts) > 100_000_000.0)
    });
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].row_count(), 7);
    assert_eq!(
        parts[1].column(0).display(&opts).to_string(),
        "Russia,Japan,Brazil"
    );
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simple.csv");
    let csv = CsvOptions::default().with_column_names(true);

    let mut grid = Grid::load_with_options(&fixture("simple.csv"), &csv, options().with_decimal_separator(','))
        .unwrap();
    grid.set_cell_type_for_column(2, CellType::Number);
    grid.push_row(Vec::<String>::new());
    grid.save(&path, &csv).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "Name,Capital,Population\nGermany,Berlin,\"83149300,00\"\nAustria,Vienna,\"8858775,00\"\n"
    );

    let reloaded = Grid::load_with_options(&path, &csv, options()).unwrap();
    assert_eq!(reloaded.row_count(), 2);
    assert_eq!(reloaded.value(2, 0).as_deref(), Some("83149300,00"));

    let raw = csv.clone().with_raw_values(true).with_delimiter(';');
    grid.save(&path, &raw).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Name;Capital;Population\nGermany;Berlin;83149300\nAustria;Vienna;8858775\n"
    );
}
