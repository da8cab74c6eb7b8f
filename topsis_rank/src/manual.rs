/*!

This is the long-form manual for `topsis_rank` and the `topsis` command.

## The method

TOPSIS ranks alternatives that are described by several numeric criteria.
Each criterion has a weight and an impact: `+` when higher values are better,
`-` when lower values are better.

1. Each criterion column is divided by its Euclidean norm.
2. Each normalized column is multiplied by its weight. Weights are used as given,
   they do not need to sum to 1.
3. The ideal best solution takes, for each criterion, the maximum value of the
   weighted column (`+`) or the minimum (`-`). The ideal worst solution takes the
   other extreme.
4. For each alternative, the Euclidean distances to the ideal best (`d+`) and to
   the ideal worst (`d-`) solutions are computed. The score is `d- / (d+ + d-)`.
5. Alternatives are ranked by decreasing score. Equal scores share the same rank
   and the following ranks are skipped (`1, 2, 2, 4`).

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel workbook. The first worksheet is used unless `--excel-worksheet-name` is given.

In both cases, the first column holds the names of the alternatives and must not
have empty cells. All the other columns are criteria and must be numeric. At least
two criteria are required. `NaN`, `inf` and `infinity` are not accepted as numbers.

```text
Model,Price,Storage,Camera,Looks
M1,250,16,12,5
M2,200,16,8,3
M3,300,32,16,4
```

## Output formats

* `csv` the input columns, unchanged, followed by `Topsis Score` and `Rank`. Rows stay
  in the order of the input.
* `json` the criteria and, for each alternative, its name, values, score and rank.

## Command line

```bash
topsis data.csv "1,1,1,2" "+,+,-,+" result.csv
```

Options can be written before or after the positional arguments:
* `--config <file>` reads the parameters from a JSON file. Positional arguments
  take precedence over it.
* `--strict` stops with an error on undefined values instead of reporting them.
* `--reference <file>` compares the output with a reference file.
* `--verbose` prints the details of the computation.

The JSON configuration uses the following keys:

```json
{
  "inputFile": "data.csv",
  "weights": "1,1,1,2",
  "impacts": "+,+,-,+",
  "outputFile": "result.csv",
  "inputType": "csv",
  "outputType": "csv",
  "excelWorksheetName": null,
  "strict": false
}
```

Relative file paths are resolved against the directory of the configuration file.

## Undefined values

A criterion column that only contains zeros cannot be normalized, and an alternative
that is at the same time the ideal best and the ideal worst solution (all the
alternatives are identical) has no defined score. By default these values are
reported as `NaN` and the corresponding alternatives receive no rank. With
`--strict`, the ranking stops with an error instead.

*/
