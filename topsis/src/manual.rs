/*!

This is the long-form manual for `topsis` (library) and the `topsis` command line program.

## The method

TOPSIS ranks alternatives by their relative closeness to a synthetic best case
and worst case. For a table of `n` alternatives scored on `m` criteria:

1. every column is divided by its Euclidean norm (a column of zeros is left as is)
2. every column is multiplied by the weight of its criterion
3. the ideal best point takes, for each criterion, the maximum for a benefit (`+`)
   criterion and the minimum for a cost (`-`) criterion. The ideal worst point
   takes the opposite.
4. the Euclidean distance of every alternative to both points is computed
5. the score is `distance to worst / (distance to best + distance to worst)`,
   or 0 if both distances are 0
6. ranks are assigned by decreasing score. Equal scores share the best rank of
   their group: `[0.9, 0.9, 0.5]` is ranked `[1, 1, 3]`.

## Input formats

* `csv` Comma Separated Values
* `xlsx` Excel spreadsheet

The first row is the header. The first column holds the name of each
alternative and is copied verbatim to the output. All the other columns are
criteria and must hold numbers only. At least 2 criteria and 2 alternatives are
required.

```text
Model,Price,Storage,Camera,Looks
M1,250,16,12,5
M2,200,16,8,3
M3,300,32,16,4
```

The input type is deduced from the file extension unless `--input-type` is
given. For Excel files, the first worksheet is used unless
`--excel-worksheet-name` is given.

## Command line

```bash
topsis data.csv "1,1,1,1" "-,+,+,+" result.csv
```

* weights: comma separated non-negative decimal numbers, one per criterion
* impacts: comma separated `+` or `-`, one per criterion
* result: the output CSV file. It contains the input table with two extra
  columns, `Topsis Score` and `Rank`. If omitted, the result is written next
  to the input as `result_<input name>.csv`.

Other flags:
* `--summary <file or stdout>` writes a JSON summary with the ideal points and
  the distances of every alternative
* `--reference <file>` compares the JSON summary with a reference summary and
  fails if they differ
* `--verbose` turns on debug logging. The `RUST_LOG` variable is also honored.

## Configuration

All the inputs can be provided in a JSON file with `--config`. Arguments given
on the command line override the values of the file. Relative paths are
resolved from the directory of the configuration file.

```json
{
  "inputSource": { "filePath": "data.csv", "provider": "csv" },
  "weights": "1,1,1,1",
  "impacts": ["-", "+", "+", "+"],
  "outputSettings": {
    "outputFile": "result.csv",
    "summaryFile": "summary.json",
    "scoreColumnName": "Topsis Score",
    "rankColumnName": "Rank"
  }
}
```

`weights` and `impacts` accept either a comma separated string or a JSON array.

 */
